// src/services/result_processor.rs
// DOCUMENTATION: Distance annotation, ordering and paging of search results
// PURPOSE: Pure transformations applied to a fresh result list

use crate::models::{GeoPoint, Place, SortOrder};

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Distance used for places that cannot be located
pub const DISTANCE_SENTINEL_KM: f64 = 9999.0;

/// Default page size
pub const RESULTS_PER_PAGE: usize = 20;

/// Great-circle distance between two coordinates in kilometers
/// Uses Haversine formula
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

pub struct ResultProcessor;

impl ResultProcessor {
    /// Annotate distances, then order according to `sort`
    pub fn process(
        mut places: Vec<Place>,
        user_location: Option<GeoPoint>,
        sort: SortOrder,
    ) -> Vec<Place> {
        Self::annotate_distances(&mut places, user_location);
        Self::sort(&mut places, sort);
        places
    }

    /// Recompute `distance` for every place; unset when it cannot be computed
    pub fn annotate_distances(places: &mut [Place], user_location: Option<GeoPoint>) {
        for place in places.iter_mut() {
            place.distance = match (user_location, place.coordinates()) {
                (Some(user), Some(target)) => Some(haversine_km(
                    user.latitude,
                    user.longitude,
                    target.latitude,
                    target.longitude,
                )),
                _ => None,
            };
        }
    }

    /// Stable ordering; missing keys rank last
    pub fn sort(places: &mut [Place], sort: SortOrder) {
        match sort {
            SortOrder::Default => {}
            SortOrder::Rating => {
                places.sort_by(|a, b| rating_key(b).total_cmp(&rating_key(a)));
            }
            SortOrder::Distance => {
                places.sort_by(|a, b| distance_key(a).total_cmp(&distance_key(b)));
            }
        }
    }
}

fn rating_key(place: &Place) -> f64 {
    place
        .google_rating
        .filter(|r| r.is_finite())
        .unwrap_or(0.0)
}

fn distance_key(place: &Place) -> f64 {
    place
        .distance
        .filter(|d| d.is_finite())
        .unwrap_or(DISTANCE_SENTINEL_KM)
}

/// One page of an ordered list
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Slice `items` into page `page` (1-based) of `per_page` entries
    pub fn of(items: Vec<T>, page: usize, per_page: usize) -> Self {
        let per_page = per_page.max(1);
        let page = page.max(1);
        let total = items.len();
        let total_pages = total.div_ceil(per_page);

        let start = (page - 1).saturating_mul(per_page);
        let items: Vec<T> = items.into_iter().skip(start).take(per_page).collect();
        let has_more = start.saturating_add(per_page) < total;

        Self {
            items,
            total,
            page,
            per_page,
            total_pages,
            has_more,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAIPEI: (f64, f64) = (25.0330, 121.5654);
    const KAOHSIUNG: (f64, f64) = (22.6273, 120.3014);

    fn rated(name: &str, rating: Option<f64>) -> Place {
        Place {
            google_rating: rating,
            ..Place::new(name, "addr")
        }
    }

    fn located(name: &str, coords: Option<(f64, f64)>) -> Place {
        Place {
            latitude: coords.map(|c| c.0),
            longitude: coords.map(|c| c.1),
            ..Place::new(name, "addr")
        }
    }

    fn names(places: &[Place]) -> Vec<&str> {
        places.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_haversine_same_point_is_zero() {
        assert_eq!(haversine_km(TAIPEI.0, TAIPEI.1, TAIPEI.0, TAIPEI.1), 0.0);
    }

    #[test]
    fn test_haversine_taipei_kaohsiung() {
        let d = haversine_km(TAIPEI.0, TAIPEI.1, KAOHSIUNG.0, KAOHSIUNG.1);
        assert!((d - 296.8).abs() < 5.0, "got {}", d);
        assert!((d - haversine_km(KAOHSIUNG.0, KAOHSIUNG.1, TAIPEI.0, TAIPEI.1)).abs() < 1e-9);
    }

    #[test]
    fn test_default_keeps_input_order() {
        let places = vec![rated("a", Some(1.0)), rated("b", Some(5.0))];
        let out = ResultProcessor::process(places, None, SortOrder::Default);
        assert_eq!(names(&out), vec!["a", "b"]);
    }

    #[test]
    fn test_rating_sort_is_stable_and_descending() {
        let places = vec![
            rated("0", Some(3.0)),
            rated("1", None),
            rated("2", Some(5.0)),
            rated("3", Some(5.0)),
        ];
        let out = ResultProcessor::process(places, None, SortOrder::Rating);
        assert_eq!(names(&out), vec!["2", "3", "0", "1"]);
    }

    #[test]
    fn test_distance_sort_without_location_keeps_order() {
        let places = vec![
            located("a", Some(KAOHSIUNG)),
            located("b", None),
            located("c", Some(TAIPEI)),
        ];
        let out = ResultProcessor::process(places, None, SortOrder::Distance);

        assert_eq!(names(&out), vec!["a", "b", "c"]);
        assert!(out.iter().all(|p| p.distance.is_none()));
    }

    #[test]
    fn test_distance_sort_with_location() {
        let user = GeoPoint::new(TAIPEI.0, TAIPEI.1);
        let places = vec![
            located("far", Some(KAOHSIUNG)),
            located("unknown", None),
            located("here", Some(TAIPEI)),
        ];
        let out = ResultProcessor::process(places, user, SortOrder::Distance);

        assert_eq!(names(&out), vec!["here", "far", "unknown"]);
        assert_eq!(out[0].distance, Some(0.0));
        assert!(out[1].distance.unwrap() > 250.0);
        assert_eq!(out[2].distance, None);
    }

    #[test]
    fn test_stale_distance_is_cleared() {
        let mut place = located("a", None);
        place.distance = Some(1.0);
        let out = ResultProcessor::process(vec![place], GeoPoint::new(0.0, 0.0), SortOrder::Default);
        assert_eq!(out[0].distance, None);
    }

    #[test]
    fn test_out_of_range_coordinates_are_ignored() {
        let place = located("bad", Some((123.0, 500.0)));
        let out = ResultProcessor::process(vec![place], GeoPoint::new(0.0, 0.0), SortOrder::Distance);
        assert_eq!(out[0].distance, None);
    }

    #[test]
    fn test_pagination() {
        let page = Page::of((0..45).collect::<Vec<_>>(), 1, RESULTS_PER_PAGE);
        assert_eq!(page.items.len(), 20);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_more);

        let page = Page::of((0..45).collect::<Vec<_>>(), 3, RESULTS_PER_PAGE);
        assert_eq!(page.items, (40..45).collect::<Vec<_>>());
        assert!(!page.has_more);

        let page = Page::of((0..5).collect::<Vec<_>>(), 9, RESULTS_PER_PAGE);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 5);

        let page: Page<u8> = Page::of(Vec::new(), 1, RESULTS_PER_PAGE);
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_more);
    }
}
