use crate::models::Place;
use std::collections::HashSet;

/// Restrict `places` to the surviving identifiers, keeping upstream order.
///
/// `None` means no filtering happened and the list is returned as is. Once a
/// filter applies, records without a `place_id` cannot match and are dropped.
pub fn merge(places: &[Place], kept: Option<&HashSet<String>>) -> Vec<Place> {
    match kept {
        Some(kept) => places
            .iter()
            .filter(|place| place.place_id().is_some_and(|id| kept.contains(id)))
            .cloned()
            .collect(),
        None => places.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn places(ids: &[&str]) -> Vec<Place> {
        ids.iter()
            .map(|id| {
                serde_json::from_value(json!({
                    "place_id": id,
                    "name": format!("Place {}", id),
                    "rating": 4.0
                }))
                .unwrap()
            })
            .collect()
    }

    fn set(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    fn ids(places: &[Place]) -> Vec<&str> {
        places.iter().filter_map(Place::place_id).collect()
    }

    #[test]
    fn no_filtering_returns_input_unchanged() {
        let input = places(&["a", "b", "c"]);
        assert_eq!(merge(&input, None), input);
    }

    #[test]
    fn keeps_survivors_in_original_order() {
        let input = places(&["a", "b", "c", "d"]);
        let merged = merge(&input, Some(&set(&["d", "b"])));

        assert_eq!(ids(&merged), vec!["b", "d"]);
        assert_eq!(merged[0], input[1]);
    }

    #[test]
    fn keeping_every_identifier_is_identity() {
        let input = places(&["a", "b", "c"]);
        assert_eq!(merge(&input, Some(&set(&["c", "a", "b"]))), input);
    }

    #[test]
    fn empty_survivor_set_yields_empty_list() {
        let input = places(&["a", "b"]);
        assert!(merge(&input, Some(&HashSet::new())).is_empty());
    }

    #[test]
    fn records_without_identifier_survive_only_unfiltered_results() {
        let mut input = places(&["a", "b"]);
        input.push(serde_json::from_value(json!({ "name": "no id", "vicinity": null })).unwrap());

        assert_eq!(merge(&input, None), input);
        assert_eq!(ids(&merge(&input, Some(&set(&["a", ""])))), vec!["a"]);
        assert_eq!(merge(&input, Some(&set(&["a", ""]))).len(), 1);
    }

    #[test]
    fn input_is_not_mutated() {
        let input = places(&["a", "b"]);
        let snapshot = input.clone();
        let _ = merge(&input, Some(&set(&["a"])));
        assert_eq!(input, snapshot);
    }
}
