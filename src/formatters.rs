use crate::models::StationWeather;
use crate::settings::Settings;

/// Formats fetched reports as the results panel: one block per station
pub fn format_results(results: &[StationWeather], include_taf: bool, label: &str) -> String {
    let mut output = format!("{} — Last Fetched\n\n", label);
    for r in results {
        output.push_str(&format!(
            "{}\n  METAR\n    {}\n",
            r.station,
            r.metar.as_deref().unwrap_or("No METAR available")
        ));
        if include_taf {
            output.push_str(&format!(
                "  TAF\n    {}\n",
                r.taf.as_deref().unwrap_or("No TAF available")
            ));
        }
        output.push('\n');
    }
    output
}

/// Raw reports only, in station order, separated by blank lines; missing reports are skipped.
pub fn glasses_content(results: &[StationWeather], include_taf: bool) -> String {
    results
        .iter()
        .flat_map(|r| {
            let taf = if include_taf { r.taf.as_deref() } else { None };
            r.metar.as_deref().into_iter().chain(taf)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn format_station_ids(ids: &[String], radius_nm: f64, lat: f64, lon: f64) -> String {
    if ids.is_empty() {
        return format!(
            "No METAR stations found within {} nm of {:.4}, {:.4}.",
            radius_nm, lat, lon
        );
    }
    let mut output = format!(
        "Nearest METAR stations within {} nm of {:.4}, {:.4}:\n\n",
        radius_nm, lat, lon
    );
    for (i, id) in ids.iter().enumerate() {
        output.push_str(&format!("{}. {}\n", i + 1, id));
    }
    output
}

fn station_list(stations: &[String]) -> String {
    if stations.is_empty() {
        "(none)".to_string()
    } else {
        stations.join(", ")
    }
}

pub fn format_settings(settings: &Settings) -> String {
    format!(
        "Nearby:\n  Include TAF: {}\nStations 1: {}\n  Include TAF: {}\nStations 2: {}\n  Include TAF: {}\n",
        settings.taf_nearby,
        station_list(&settings.tab_1.stations),
        settings.tab_1.include_taf,
        station_list(&settings.tab_2.stations),
        settings.tab_2.include_taf,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wx(station: &str, metar: Option<&str>, taf: Option<&str>) -> StationWeather {
        StationWeather {
            station: station.to_string(),
            metar: metar.map(str::to_string),
            taf: taf.map(str::to_string),
        }
    }

    #[test]
    fn glasses_content_joins_present_reports() {
        let results = vec![
            wx("CYOW", Some("METAR CYOW"), Some("TAF CYOW")),
            wx("CYND", None, Some("TAF CYND")),
            wx("CYUL", Some("METAR CYUL"), None),
        ];

        assert_eq!(
            glasses_content(&results, true),
            "METAR CYOW\n\nTAF CYOW\n\nTAF CYND\n\nMETAR CYUL"
        );
        assert_eq!(glasses_content(&results, false), "METAR CYOW\n\nMETAR CYUL");
        assert_eq!(glasses_content(&[wx("CYND", None, None)], true), "");
    }

    #[test]
    fn results_mark_missing_reports() {
        let results = vec![wx("CYND", None, None)];

        let without_taf = format_results(&results, false, "Stations 1");
        assert!(without_taf.starts_with("Stations 1 — Last Fetched"));
        assert!(without_taf.contains("No METAR available"));
        assert!(!without_taf.contains("TAF"));

        let with_taf = format_results(&results, true, "Stations 1");
        assert!(with_taf.contains("No TAF available"));
    }

    #[test]
    fn station_list_is_numbered() {
        let ids = vec!["CYHU".to_string(), "CYUL".to_string()];
        let text = format_station_ids(&ids, 75.0, 45.0, -73.0);
        assert!(text.contains("within 75 nm of 45.0000, -73.0000"));
        assert!(text.contains("1. CYHU\n2. CYUL\n"));

        let none = format_station_ids(&[], 75.0, 45.0, -73.0);
        assert!(none.starts_with("No METAR stations found"));
    }

    #[test]
    fn settings_show_empty_lists() {
        let text = format_settings(&Settings::default());
        assert!(text.contains("Stations 1: CYPQ"));
        assert!(text.contains("Stations 2: (none)"));
    }
}
