use std::fmt::Display;
use convert_case::{Case, Casing};

/// Every combination of the named value lists, one value per name, keeping
/// the names in the order given. The first list varies slowest.
///
/// No lists yields a single empty combination; any empty list yields none.
pub fn combinations<'a, K, V>(params: &'a [(K, Vec<V>)]) -> Vec<Vec<(&'a K, &'a V)>> {
    let mut output: Vec<Vec<(&K, &V)>> = vec![vec![]];

    for (key, values) in params {
        output = output
            .into_iter()
            .flat_map(|prefix| {
                values.iter().map(move |value| {
                    let mut combination = prefix.clone();
                    combination.push((key, value));
                    combination
                })
            })
            .collect();
    }

    output
}

/// Expands `base` into one request URL per parameter combination by appending
/// `&Key=Value` segments. Keys are title-cased, values are left as given.
///
/// A base that already ends in `&` or `?` is not given a second separator, so
/// `sample_url&` and `sample_url` both expand to `sample_url&Suburb=SuburbA`.
pub fn build_urls<K, V>(base: &str, params: &[(K, Vec<V>)]) -> Vec<String>
where
    K: Display,
    V: Display,
{
    if params.is_empty() {
        return vec![base.to_string()];
    }

    combinations(params)
        .into_iter()
        .map(|combination| {
            combination.iter().fold(base.to_string(), |mut url, (key, value)| {
                if !url.ends_with('&') && !url.ends_with('?') {
                    url.push('&');
                }
                url.push_str(&format!("{}={}", key.to_string().to_case(Case::Pascal), value));
                url
            })
        })
        .collect()
}
