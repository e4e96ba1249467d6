// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Domain namespaces built on the dispatch surface. Each one registers its
// methods, decodes its own argument shapes, and reports back through the
// callbacks it was given.

pub mod navigation_bar;
pub mod platform;

pub use navigation_bar::{NavigationBarBridge, NavigationOptions};
pub use platform::{DialogAction, DialogData, Info, PlatformBridge, ShareData};
