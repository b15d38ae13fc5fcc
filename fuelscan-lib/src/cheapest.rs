use crate::station::Station;

pub const DEFAULT_CHEAPEST: usize = 2;

/// The `n` stations with the lowest discounted price, cheapest first.
///
/// Stations with equal discounted prices keep their input order.
pub fn find_cheapest(stations: &[Station], n: usize) -> Vec<Station> {
    if n == 0 {
        return vec![];
    }

    let mut ranked: Vec<&Station> = stations.iter().collect();
    ranked.sort_by(|a, b| a.discounted_price().total_cmp(&b.discounted_price()));

    ranked.into_iter().take(n).cloned().collect()
}
