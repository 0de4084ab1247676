//! Property-based tests for import path handling.
//!
//! These tests use proptest to generate import paths and check that
//! validation and the import-path/filesystem mapping agree for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::filesystem::{
        import_path_from_relative, import_path_to_relative, validate_import_path, vendor_path,
    };
    use proptest::prelude::*;
    use std::path::Path;

    fn segment() -> impl Strategy<Value = String> {
        "[a-z0-9][a-z0-9._-]{0,12}"
    }

    fn import_path() -> impl Strategy<Value = String> {
        prop::collection::vec(segment(), 1..5).prop_map(|segments| segments.join("/"))
    }

    proptest! {
        /// Property: well-formed import paths are accepted
        #[test]
        fn well_formed_paths_validate(path in import_path()) {
            prop_assert!(validate_import_path(&path).is_ok());
        }

        /// Property: mapping an import path to a relative path and back is lossless
        #[test]
        fn relative_mapping_is_lossless(path in import_path()) {
            let relative = import_path_to_relative(&path);
            prop_assert_eq!(import_path_from_relative(&relative), path);
        }

        /// Property: every vendor path stays under `<base>/vendor`
        #[test]
        fn vendor_path_stays_under_vendor_root(path in import_path()) {
            let base = Path::new("/work/app");
            prop_assert!(vendor_path(base, &path).starts_with(base.join("vendor")));
        }

        /// Property: a `..` segment anywhere is rejected
        #[test]
        fn parent_segments_are_rejected(
            before in prop::collection::vec(segment(), 0..3),
            after in prop::collection::vec(segment(), 0..3),
        ) {
            let mut segments = before;
            segments.push("..".to_string());
            segments.extend(after);
            prop_assert!(validate_import_path(&segments.join("/")).is_err());
        }

        /// Property: absolute paths are rejected
        #[test]
        fn absolute_paths_are_rejected(path in import_path()) {
            let absolute = format!("/{}", path);
            prop_assert!(validate_import_path(&absolute).is_err());
        }
    }
}
