//! Property-based tests for NEVRA parsing and path reconstruction.
//!
//! These tests use proptest to generate package identities and verify that
//! the path invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::nevra::{file_name, package_path, split_file_name, Nevra};
    use proptest::prelude::*;

    // ============================================================================
    // package_path property tests
    // ============================================================================

    proptest! {
        /// Property: the reconstructed path always lives under Packages/ and ends in .rpm
        #[test]
        fn package_path_is_under_packages_dir(
            name in "[a-z][a-z0-9_+-]{0,15}[a-z0-9]",
            epoch in 0u32..10,
            version in "[0-9][0-9.]{0,6}",
            release in "[0-9][a-z0-9.+_]{0,10}",
            arch in "(x86_64|noarch|aarch64|i686|s390x)",
        ) {
            let text = format!("{}-{}:{}-{}.{}", name, epoch, version, release, arch);
            let path = package_path(&text).unwrap();
            prop_assert!(path.starts_with("Packages/"));
            prop_assert!(path.ends_with(".rpm"));
            prop_assert!(!path.contains(':'), "epoch leaked into {}", path);
        }

        /// Property: splitting the file name recovers (name, version, release.arch)
        #[test]
        fn file_name_split_recovers_fields(
            name in "[a-z][a-z0-9_+-]{0,15}[a-z0-9]",
            epoch in 0u32..10,
            version in "[0-9][0-9.]{0,6}",
            release in "[0-9][a-z0-9.+_]{0,10}",
            arch in "(x86_64|noarch|aarch64|i686|s390x)",
        ) {
            let text = format!("{}-{}:{}-{}.{}", name, epoch, version, release, arch);
            let path = package_path(&text).unwrap();
            let (n, v, ra) = split_file_name(file_name(&path)).unwrap();
            prop_assert_eq!(n, name.as_str());
            prop_assert_eq!(v, version.as_str());
            prop_assert_eq!(ra, format!("{}.{}", release, arch));
        }

        /// Property: parsing then displaying returns the original string
        #[test]
        fn display_is_inverse_of_parse(
            name in "[a-z][a-z0-9_+-]{0,15}[a-z0-9]",
            epoch in 0u32..100,
            version in "[0-9][0-9.]{0,6}",
            release in "[0-9][a-z0-9.+_]{0,10}",
            arch in "(x86_64|noarch|aarch64|i686|s390x)",
        ) {
            let text = format!("{}-{}:{}-{}.{}", name, epoch, version, release, arch);
            let nevra = Nevra::parse(&text).unwrap();
            prop_assert_eq!(nevra.to_string(), text);
        }

        /// Property: an identifier without an epoch colon is always rejected
        #[test]
        fn epochless_nevra_is_rejected(
            name in "[a-z][a-z0-9]{0,10}",
            version in "[0-9][0-9.]{0,6}",
            release in "[0-9][a-z0-9.]{0,8}",
        ) {
            let text = format!("{}-{}-{}.x86_64", name, version, release);
            prop_assert!(Nevra::parse(&text).is_err());
        }
    }

    // ============================================================================
    // file_name property tests
    // ============================================================================

    proptest! {
        /// Property: file_name never returns a string containing a separator
        #[test]
        fn file_name_has_no_separator(path in "[a-zA-Z0-9/._-]{0,40}") {
            prop_assert!(!file_name(&path).contains('/'));
        }

        /// Property: file_name is a suffix of its input
        #[test]
        fn file_name_is_suffix(path in "[a-zA-Z0-9/._-]{0,40}") {
            prop_assert!(path.ends_with(file_name(&path)));
        }
    }
}
