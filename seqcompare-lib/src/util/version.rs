pub mod built_info {
    use lazy_static::lazy_static;
    include!(concat!(env!("OUT_DIR"), "/built.rs"));

    /// Get a software version string including
    ///   - Git commit hash
    ///   - Git dirty info (whether the repo had uncommitted changes)
    ///   - Cargo package version if no git info found
    fn get_software_version() -> String {
        let prefix = match GIT_COMMIT_HASH {
            Some(hash) if hash.len() >= 8 => format!("{PKG_VERSION}-{}", &hash[0..8]),
            _ => PKG_VERSION.to_string(),
        };
        let suffix = match GIT_DIRTY {
            Some(true) => "-dirty",
            _ => "",
        };
        format!("{prefix}{suffix}")
    }

    lazy_static! {
        /// Version of the software with git hash
        pub static ref VERSION: String = get_software_version();
    }
}

#[cfg(test)]
mod tests {
    use super::built_info::{PKG_VERSION, VERSION};

    #[test]
    fn test_version_starts_with_package_version() {
        assert!(VERSION.starts_with(PKG_VERSION));
    }
}
