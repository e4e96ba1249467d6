// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Where the console looks for its bridge configuration.

use std::ffi::OsString;
use std::path::PathBuf;

/// `$DINGO_CONFIG`, else `dingo/config.json` under the XDG config dir.
pub fn config_path() -> Option<PathBuf> {
    resolve(
        std::env::var_os("DINGO_CONFIG"),
        std::env::var_os("XDG_CONFIG_HOME"),
        std::env::var_os("HOME"),
    )
}

fn resolve(
    explicit: Option<OsString>,
    xdg_config: Option<OsString>,
    home: Option<OsString>,
) -> Option<PathBuf> {
    let non_empty = |v: Option<OsString>| v.filter(|v| !v.is_empty()).map(PathBuf::from);
    if let Some(path) = non_empty(explicit) {
        return Some(path);
    }
    let base = non_empty(xdg_config).or_else(|| non_empty(home).map(|h| h.join(".config")))?;
    Some(base.join("dingo").join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let path = resolve(Some("/etc/dingo.json".into()), Some("/xdg".into()), Some("/home/u".into()));
        assert_eq!(path, Some(PathBuf::from("/etc/dingo.json")));
    }

    #[test]
    fn falls_back_through_xdg_then_home() {
        assert_eq!(
            resolve(None, Some("/xdg".into()), Some("/home/u".into())),
            Some(PathBuf::from("/xdg/dingo/config.json"))
        );
        assert_eq!(
            resolve(Some("".into()), None, Some("/home/u".into())),
            Some(PathBuf::from("/home/u/.config/dingo/config.json"))
        );
        assert_eq!(resolve(None, None, None), None);
    }
}
