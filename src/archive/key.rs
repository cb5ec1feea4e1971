//! Archive destination keys.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::file_prefix;

/// Builds the archive key for `file_name` ingested on `date`.
///
/// The first three characters of the name select the root directory from
/// `file_map`; the key is then `<root>/<YYYY>/<MM>/<DD>/<file_name>`. Names
/// with no mapping archive under their bare basename.
pub fn archive_key(file_name: &str, date: NaiveDate, file_map: &BTreeMap<String, String>) -> String {
    match file_map.get(file_prefix(file_name)) {
        Some(root) => format!("{}/{}/{}", root, date.format("%Y/%m/%d"), file_name),
        None => file_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_mapped_prefix() {
        let date = NaiveDate::from_ymd_opt(2020, 5, 1).unwrap();
        assert_eq!(
            archive_key("dga-feed-2020-05-01.csv", date, &map(&[("dga", "bambenek")])),
            "bambenek/2020/05/01/dga-feed-2020-05-01.csv"
        );
    }

    #[test]
    fn test_unmapped_prefix_is_bare_basename() {
        let date = NaiveDate::from_ymd_opt(2020, 5, 1).unwrap();
        assert_eq!(
            archive_key("unknownfile.csv", date, &map(&[("dga", "bambenek")])),
            "unknownfile.csv"
        );
        assert_eq!(archive_key("to", date, &map(&[("top", "umbrella")])), "to");
    }
}
