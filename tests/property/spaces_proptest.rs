//! Property-based tests for space creation, titles and the color palette

use crate::common::{repository_for, runtime};
use proptest::prelude::*;
use reflecto::baas::MemoryStore;
use reflecto::shared::space::normalize_title;
use reflecto::shared::SpaceColor;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_created_space_lists_once(index in 0usize..8, title in "\\s{0,2}[a-zA-Z0-9][a-zA-Z0-9 ]{0,19}") {
        let color = SpaceColor::ALL[index];
        let (space_id, entries) = runtime().block_on(async {
            let store = MemoryStore::new();
            let repository = repository_for(&store, "ada");
            let space_id = repository.create(&title, color, None).await.unwrap();
            (space_id, repository.list_for_user().await.unwrap())
        });

        prop_assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        prop_assert_eq!(&entry.record.space_id, &space_id);
        prop_assert_eq!(entry.record.title.as_deref(), Some(title.trim()));
        prop_assert_eq!(entry.record.color(), color);
        prop_assert!(entry.record.snapshot.is_none());
        prop_assert!(entry.snapshot.is_none());
    }

    #[test]
    fn test_normalized_color_is_in_palette(raw in ".{0,10}") {
        let color = SpaceColor::normalize(Some(raw.as_str()));
        prop_assert!(SpaceColor::ALL.contains(&color));
        if SpaceColor::from_hex(&raw).is_none() {
            prop_assert_eq!(color, SpaceColor::Blue);
        }
    }

    #[test]
    fn test_palette_hex_round_trips(index in 0usize..8) {
        let color = SpaceColor::ALL[index];
        prop_assert_eq!(SpaceColor::from_hex(color.hex()), Some(color));
        prop_assert_eq!(SpaceColor::from_hex(&color.hex().to_uppercase()), Some(color));
    }

    #[test]
    fn test_normalized_title_is_trimmed(title in "\\s{0,3}[a-zA-Z0-9 ]{0,20}\\s{0,3}") {
        match normalize_title(&title) {
            Ok(normalized) => {
                prop_assert_eq!(normalized.as_str(), title.trim());
                prop_assert!(!normalized.is_empty());
            }
            Err(_) => prop_assert!(title.trim().is_empty()),
        }
    }
}
