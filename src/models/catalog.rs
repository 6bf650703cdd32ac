// src/models/catalog.rs
// DOCUMENTATION: Fixed search enumerations
// PURPOSE: Cities, districts and place types a search may use

use serde::Serialize;

/// Sentinel meaning "no filter" for district and place type
pub const ANY: &str = "不拘";

/// A city and its selectable districts
#[derive(Debug, Serialize)]
pub struct City {
    pub name: &'static str,
    pub districts: &'static [&'static str],
}

pub const PLACE_TYPES: &[&str] = &[
    ANY,
    "餐廳",
    "咖啡廳",
    "飯店",
    "公園",
    "景點",
    "寵物美容",
    "寵物用品店",
];

pub const CITIES: &[City] = &[
    City {
        name: "臺北市",
        districts: &[
            "中正區", "大同區", "中山區", "松山區", "大安區", "萬華區", "信義區", "士林區",
            "北投區", "內湖區", "南港區", "文山區",
        ],
    },
    City {
        name: "新北市",
        districts: &[
            "板橋區", "三重區", "中和區", "永和區", "新莊區", "新店區", "樹林區", "鶯歌區",
            "三峽區", "淡水區", "汐止區", "瑞芳區", "土城區", "蘆洲區", "五股區", "泰山區",
            "林口區",
        ],
    },
    City {
        name: "桃園市",
        districts: &[
            "桃園區", "中壢區", "平鎮區", "八德區", "楊梅區", "蘆竹區", "大溪區", "龍潭區",
            "龜山區", "大園區", "觀音區", "新屋區",
        ],
    },
    City {
        name: "臺中市",
        districts: &[
            "中區", "東區", "南區", "西區", "北區", "北屯區", "西屯區", "南屯區", "太平區",
            "大里區", "霧峰區", "烏日區", "豐原區", "后里區", "石岡區", "東勢區", "和平區",
            "新社區", "潭子區", "大雅區", "神岡區", "大肚區", "沙鹿區", "龍井區", "梧棲區",
            "清水區", "大甲區", "外埔區", "大安區",
        ],
    },
    City {
        name: "臺南市",
        districts: &[
            "中西區", "東區", "南區", "北區", "安平區", "安南區", "永康區", "歸仁區", "新化區",
        ],
    },
    City {
        name: "高雄市",
        districts: &[
            "新興區", "前金區", "苓雅區", "鹽埕區", "鼓山區", "旗津區", "前鎮區", "三民區",
            "楠梓區", "小港區", "左營區",
        ],
    },
];

pub fn find_city(name: &str) -> Option<&'static City> {
    CITIES.iter().find(|c| c.name == name)
}

/// Check a city/district/type combination against the catalog
pub fn check_criteria(city: &str, district: &str, place_type: &str) -> Result<(), String> {
    let city_entry = find_city(city).ok_or_else(|| format!("Unknown city: {}", city))?;

    if district != ANY && !city_entry.districts.contains(&district) {
        return Err(format!("Unknown district for {}: {}", city, district));
    }

    if !PLACE_TYPES.contains(&place_type) {
        return Err(format!("Unknown place type: {}", place_type));
    }

    Ok(())
}

/// Serializable view of the whole catalog for GET /catalog
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub any: &'static str,
    pub cities: &'static [City],
    pub place_types: &'static [&'static str],
}

pub fn catalog() -> CatalogResponse {
    CatalogResponse {
        any: ANY,
        cities: CITIES,
        place_types: PLACE_TYPES,
    }
}
