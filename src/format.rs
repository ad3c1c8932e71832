/// Human-readable list formatting for evaluation messages.
///
/// Lists are deduplicated, sorted case-insensitively, and joined with a comma
/// between all but the last two entries, e.g. "BRAF, EGFR and KRAS".
pub fn concat<I, S>(strings: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    concat_with_separator(strings, " and ")
}

pub fn concat_with_or<I, S>(strings: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    concat_with_separator(strings, " or ")
}

fn concat_with_separator<I, S>(strings: I, separator: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut list: Vec<String> = strings
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect();
    list.sort_by_key(|s| s.to_lowercase());
    list.dedup();
    match list.len() {
        0 => String::new(),
        1 => list.remove(0),
        _ => {
            let last = list.pop().unwrap_or_default();
            format!("{}{}{}", list.join(", "), separator, last)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concat_empty() {
        assert_eq!(concat(Vec::<String>::new()), "");
    }

    #[test]
    fn test_concat_single() {
        assert_eq!(concat(["EGFR"]), "EGFR");
    }

    #[test]
    fn test_concat_two() {
        assert_eq!(concat(["KRAS", "EGFR"]), "EGFR and KRAS");
    }

    #[test]
    fn test_concat_many_sorted_case_insensitively() {
        assert_eq!(concat(["KRAS", "braf", "EGFR"]), "braf, EGFR and KRAS");
    }

    #[test]
    fn test_concat_dedupes() {
        assert_eq!(concat(["EGFR", "EGFR"]), "EGFR");
    }

    #[test]
    fn test_concat_with_or() {
        assert_eq!(
            concat_with_or(["mutations", "fusions"]),
            "fusions or mutations"
        );
    }
}
