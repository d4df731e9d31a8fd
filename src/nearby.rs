//! Nearest-station selection: keep METAR stations, rank by the directory's
//! priority and then by distance, and truncate.

use std::cmp::Ordering;

use crate::constants::METAR_SITE_TYPE;
use crate::geo::distance_nm;
use crate::models::StationInfo;

/// An eligible station with its distance from the search center.
#[derive(Debug, Clone, PartialEq)]
pub struct StationCandidate {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    pub priority: i64,
    pub distance_nm: f64,
}

impl StationCandidate {
    /// Returns `None` for entries without an identifier or without METAR.
    pub fn from_info(info: &StationInfo, center_lat: f64, center_lon: f64) -> Option<Self> {
        let id = info.icao_id.as_deref().filter(|id| !id.is_empty())?;
        if !info.site_type.iter().any(|t| t == METAR_SITE_TYPE) {
            return None;
        }
        Some(Self {
            id: id.to_string(),
            lat: info.lat,
            lon: info.lon,
            priority: info.priority,
            distance_nm: distance_nm(center_lat, center_lon, info.lat, info.lon),
        })
    }
}

/// Priority first, lower wins; distance breaks ties.
fn rank(a: &StationCandidate, b: &StationCandidate) -> Ordering {
    a.priority
        .cmp(&b.priority)
        .then_with(|| a.distance_nm.total_cmp(&b.distance_nm))
}

/// Filters, ranks and truncates directory records to at most `max_count` ids.
///
/// An empty result is a valid outcome, not an error.
pub fn select_nearest(
    stations: &[StationInfo],
    center_lat: f64,
    center_lon: f64,
    max_count: usize,
) -> Vec<String> {
    let mut candidates: Vec<StationCandidate> = stations
        .iter()
        .filter_map(|s| StationCandidate::from_info(s, center_lat, center_lon))
        .collect();
    candidates.sort_by(rank);
    candidates
        .into_iter()
        .take(max_count)
        .map(|c| c.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::NM_PER_DEGREE;

    const CENTER: (f64, f64) = (45.0, -73.0);

    /// Station due north of the center at roughly `dist_nm`.
    fn station(id: &str, priority: i64, dist_nm: f64, site_types: &[&str]) -> StationInfo {
        StationInfo {
            icao_id: Some(id.to_string()),
            lat: CENTER.0 + dist_nm / NM_PER_DEGREE,
            lon: CENTER.1,
            site_type: site_types.iter().map(|s| s.to_string()).collect(),
            priority,
        }
    }

    fn metar(id: &str, priority: i64, dist_nm: f64) -> StationInfo {
        station(id, priority, dist_nm, &["METAR", "TAF"])
    }

    #[test]
    fn priority_outranks_distance() {
        let stations = vec![metar("AAAA", 2, 5.0), metar("BBBB", 1, 10.0), metar("CCCC", 1, 3.0)];
        let ids = select_nearest(&stations, CENTER.0, CENTER.1, 2);
        assert_eq!(ids, vec!["CCCC", "BBBB"]);
    }

    #[test]
    fn montreal_example() {
        let stations = vec![metar("CYUL", 1, 20.0), metar("CYHU", 1, 15.0), metar("CYMX", 3, 5.0)];
        let ids = select_nearest(&stations, CENTER.0, CENTER.1, 2);
        assert_eq!(ids, vec!["CYHU", "CYUL"]);
    }

    #[test]
    fn stations_without_metar_are_never_selected() {
        let stations = vec![
            station("KAAA", 1, 5.0, &["TAF"]),
            station("KBBB", 1, 6.0, &[]),
            station("KCCC", 1, 7.0, &["RAOB", "NEXRAD"]),
        ];
        for n in [0, 1, 5, 100] {
            assert!(select_nearest(&stations, CENTER.0, CENTER.1, n).is_empty());
        }
    }

    #[test]
    fn stations_without_identifier_are_dropped() {
        let mut unnamed = metar("XXXX", 1, 1.0);
        unnamed.icao_id = None;
        let mut blank = metar("XXXX", 1, 2.0);
        blank.icao_id = Some(String::new());
        let stations = vec![unnamed, blank, metar("CYOW", 5, 50.0)];

        assert_eq!(select_nearest(&stations, CENTER.0, CENTER.1, 5), vec!["CYOW"]);
    }

    #[test]
    fn result_length_is_capped_but_never_padded() {
        let stations = vec![metar("AAAA", 1, 1.0), metar("BBBB", 1, 2.0), metar("CCCC", 1, 3.0)];
        assert_eq!(select_nearest(&stations, CENTER.0, CENTER.1, 2).len(), 2);
        assert_eq!(select_nearest(&stations, CENTER.0, CENTER.1, 10).len(), 3);
        assert!(select_nearest(&[], CENTER.0, CENTER.1, 5).is_empty());
    }

    #[test]
    fn candidate_carries_distance() {
        let info = metar("CYHU", 1, 15.0);
        let candidate = StationCandidate::from_info(&info, CENTER.0, CENTER.1).unwrap();
        assert!((candidate.distance_nm - 15.0).abs() < 0.1);
    }
}
