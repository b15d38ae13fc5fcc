use crate::station::Station;

pub static MESSAGE_HEADER: &'static str = "The cheapest fuel stations:";

/// Renders the header followed by one `<price> (<discount>) at <name>, <address>`
/// line per station.
pub fn format_message(stations: &[Station]) -> String {
    let mut lines: Vec<String> = vec![MESSAGE_HEADER.to_string()];
    lines.extend(stations.iter().map(|station| station.to_string()));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::station::Station;
    use super::format_message;

    #[test]
    fn single_station() {
        let stations = vec![Station::new("X", "Addr", 128.9, 5.0).unwrap()];
        assert_eq!(
            format_message(&stations),
            "The cheapest fuel stations:\n128.9 (5) at X, Addr"
        );
    }

    #[test]
    fn empty_is_header_only() {
        assert_eq!(format_message(&[]), "The cheapest fuel stations:");
    }

    #[test]
    fn one_line_per_station_in_order() {
        let stations = vec![
            Station::new("Caltex StarMart Bassendean", "309 Guildford Rd, BASSENDEAN", 129.9, 4.0).unwrap(),
            Station::new("Shell Gidgegannup", "2095 Toodyay Rd, GIDGEGANNUP", 137.9, 0.0).unwrap(),
        ];
        assert_eq!(
            format_message(&stations),
            "The cheapest fuel stations:\n\
             129.9 (4) at Caltex StarMart Bassendean, 309 Guildford Rd, BASSENDEAN\n\
             137.9 (0) at Shell Gidgegannup, 2095 Toodyay Rd, GIDGEGANNUP"
        );
    }
}
