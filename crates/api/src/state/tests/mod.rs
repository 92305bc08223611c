// Path: crates/api/src/state/tests/mod.rs

#[cfg(test)]
mod basic_state_tests {
    use crate::state::{apply_changes, read_value, write_value, RecordingState, StateAccess, StateOverlay};
    use ante_types::error::StateError;
    use std::collections::BTreeMap;

    // Mock state implementation
    #[derive(Default)]
    struct MockState {
        data: BTreeMap<Vec<u8>, Vec<u8>>,
    }

    impl StateAccess for MockState {
        fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
            Ok(self.data.get(key).cloned())
        }

        fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError> {
            self.data.insert(key.to_vec(), value.to_vec());
            Ok(())
        }

        fn delete(&mut self, key: &[u8]) -> Result<(), StateError> {
            self.data.remove(key);
            Ok(())
        }

        fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StateError> {
            Ok(self
                .data
                .range(prefix.to_vec()..)
                .take_while(|(k, _)| k.starts_with(prefix))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect())
        }
    }

    fn seeded() -> MockState {
        let mut state = MockState::default();
        state.insert(b"a::1", b"one").unwrap();
        state.insert(b"a::2", b"two").unwrap();
        state.insert(b"b::1", b"other").unwrap();
        state
    }

    #[test]
    fn test_overlay_reads_through_and_shadows() {
        let base = seeded();
        let mut overlay = StateOverlay::new(&base);

        assert_eq!(overlay.get(b"a::1").unwrap(), Some(b"one".to_vec()));
        overlay.insert(b"a::1", b"uno").unwrap();
        overlay.delete(b"a::2").unwrap();

        assert_eq!(overlay.get(b"a::1").unwrap(), Some(b"uno".to_vec()));
        assert_eq!(overlay.get(b"a::2").unwrap(), None);
        // The base is untouched.
        assert_eq!(base.get(b"a::2").unwrap(), Some(b"two".to_vec()));
    }

    #[test]
    fn test_overlay_prefix_scan_merges_writes() {
        let base = seeded();
        let mut overlay = StateOverlay::new(&base);
        overlay.delete(b"a::1").unwrap();
        overlay.insert(b"a::3", b"three").unwrap();
        overlay.insert(b"c::1", b"unrelated").unwrap();

        let scanned = overlay.prefix_scan(b"a::").unwrap();
        assert_eq!(
            scanned,
            vec![
                (b"a::2".to_vec(), b"two".to_vec()),
                (b"a::3".to_vec(), b"three".to_vec()),
            ]
        );
    }

    #[test]
    fn test_dropped_overlay_discards_writes() {
        let base = seeded();
        {
            let mut overlay = StateOverlay::new(&base);
            overlay.insert(b"a::1", b"changed").unwrap();
        }
        assert_eq!(base.get(b"a::1").unwrap(), Some(b"one".to_vec()));
    }

    #[test]
    fn test_ordered_batch_applies_deterministically() {
        let mut base = seeded();
        let changes = {
            let mut overlay = StateOverlay::new(&base);
            overlay.insert(b"z", b"last").unwrap();
            overlay.insert(b"a::9", b"first").unwrap();
            overlay.delete(b"b::1").unwrap();
            assert_eq!(overlay.len(), 3);
            overlay.into_ordered_batch()
        };
        assert_eq!(changes.0[0].0, b"a::9".to_vec());
        assert_eq!(changes.1, vec![b"b::1".to_vec()]);

        apply_changes(&mut base, changes).unwrap();
        assert_eq!(base.get(b"z").unwrap(), Some(b"last".to_vec()));
        assert_eq!(base.get(b"b::1").unwrap(), None);
    }

    #[test]
    fn test_nested_overlay_commits_into_parent() {
        let base = seeded();
        let mut outer = StateOverlay::new(&base);
        outer.insert(b"fee", b"paid").unwrap();

        let changes = {
            let mut inner = StateOverlay::new(&outer);
            inner.insert(b"msg", b"done").unwrap();
            assert_eq!(inner.get(b"fee").unwrap(), Some(b"paid".to_vec()));
            inner.into_ordered_batch()
        };
        apply_changes(&mut outer, changes).unwrap();
        assert_eq!(outer.get(b"msg").unwrap(), Some(b"done".to_vec()));
    }

    #[test]
    fn test_scale_value_helpers() {
        let mut state = MockState::default();
        write_value(&mut state, b"n", &42u64).unwrap();
        assert_eq!(read_value::<u64>(&state, b"n").unwrap(), Some(42));
        assert_eq!(read_value::<u64>(&state, b"missing").unwrap(), None);

        state.insert(b"bad", &[1, 2]).unwrap();
        assert!(matches!(
            read_value::<u64>(&state, b"bad"),
            Err(StateError::Decode(_))
        ));
    }

    #[test]
    fn test_read_set_detects_stale_values() {
        let mut base = seeded();
        let read_set = {
            let recorder = RecordingState::new(&base);
            let mut overlay = StateOverlay::new(&recorder);
            overlay.get(b"a::1").unwrap();
            overlay.get(b"absent").unwrap();
            // Reads served by the overlay's own writes are not recorded.
            overlay.insert(b"own", b"x").unwrap();
            overlay.get(b"own").unwrap();
            drop(overlay);
            recorder.into_read_set()
        };
        assert_eq!(read_set.len(), 2);
        assert!(read_set.is_valid_against(&base).unwrap());

        base.insert(b"absent", b"now present").unwrap();
        assert!(!read_set.is_valid_against(&base).unwrap());
    }

    #[test]
    fn test_read_set_tracks_prefix_insertions() {
        let mut base = seeded();
        let recorder = RecordingState::new(&base);
        recorder.prefix_scan(b"a::").unwrap();
        let read_set = recorder.into_read_set();

        base.insert(b"b::2", b"outside").unwrap();
        assert!(read_set.is_valid_against(&base).unwrap());
        base.insert(b"a::3", b"inside").unwrap();
        assert!(!read_set.is_valid_against(&base).unwrap());
    }

    #[test]
    fn test_recording_state_refuses_writes() {
        let base = seeded();
        let mut recorder = RecordingState::new(&base);
        assert!(recorder.insert(b"k", b"v").is_err());
        assert!(recorder.delete(b"a::1").is_err());
    }
}
