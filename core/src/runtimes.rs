//! The target runtimes a plan can be generated for.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Language identifier the indexer uses for the reference tree.
pub const REFERENCE_LANGUAGE: &str = "java";

/// File extension of reference source files.
pub const REFERENCE_EXTENSION: &str = "java";

/// Name under which reference-tree symbol tables are stored.
pub const REFERENCE_NAME: &str = "spine-libgdx";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum TargetRuntime {
    #[serde(rename = "spine-cpp")]
    #[cfg_attr(feature = "cli", value(name = "spine-cpp"))]
    SpineCpp,
    #[serde(rename = "spine-c")]
    #[cfg_attr(feature = "cli", value(name = "spine-c"))]
    SpineC,
    #[serde(rename = "spine-csharp")]
    #[cfg_attr(feature = "cli", value(name = "spine-csharp"))]
    SpineCsharp,
    #[serde(rename = "spine-haxe")]
    #[cfg_attr(feature = "cli", value(name = "spine-haxe"))]
    SpineHaxe,
    #[serde(rename = "spine-ts")]
    #[cfg_attr(feature = "cli", value(name = "spine-ts"))]
    SpineTs,
}

impl TargetRuntime {
    pub const ALL: [TargetRuntime; 5] = [
        Self::SpineCpp,
        Self::SpineC,
        Self::SpineCsharp,
        Self::SpineHaxe,
        Self::SpineTs,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::SpineCpp => "spine-cpp",
            Self::SpineC => "spine-c",
            Self::SpineCsharp => "spine-csharp",
            Self::SpineHaxe => "spine-haxe",
            Self::SpineTs => "spine-ts",
        }
    }

    /// Language identifier passed to the indexer.
    pub fn language(self) -> &'static str {
        match self {
            Self::SpineCpp => "cpp",
            Self::SpineC => "c",
            Self::SpineCsharp => "csharp",
            Self::SpineHaxe => "haxe",
            Self::SpineTs => "typescript",
        }
    }

    /// Source tree of the runtime, relative to the spine-runtimes root.
    pub fn source_dir(self) -> &'static str {
        match self {
            Self::SpineCpp => "spine-cpp/spine-cpp",
            Self::SpineC => "spine-c/spine-c",
            Self::SpineCsharp => "spine-csharp/src",
            Self::SpineHaxe => "spine-haxe/spine-haxe/spine",
            Self::SpineTs => "spine-ts/spine-core/src",
        }
    }

    /// Header/implementation extension pairs for split layouts.
    pub fn companion_extensions(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::SpineCpp => &[("h", "cpp")],
            Self::SpineC => &[("h", "c")],
            Self::SpineCsharp | Self::SpineHaxe | Self::SpineTs => &[],
        }
    }

    /// Whether `a` and `b` are the two halves of a split declaration
    /// (`include/spine/Bone.h` and `src/spine/Bone.cpp`). Only the file stem
    /// and extension are compared since headers and sources usually live in
    /// different directories.
    pub fn are_companions(self, a: &Path, b: &Path) -> bool {
        let (Some(stem_a), Some(stem_b)) = (a.file_stem(), b.file_stem()) else {
            return false;
        };
        if stem_a != stem_b {
            return false;
        }
        let (Some(ext_a), Some(ext_b)) = (
            a.extension().and_then(|e| e.to_str()),
            b.extension().and_then(|e| e.to_str()),
        ) else {
            return false;
        };
        self.companion_extensions()
            .iter()
            .any(|&(header, source)| {
                (ext_a == header && ext_b == source) || (ext_a == source && ext_b == header)
            })
    }

    /// File name of this runtime's symbol table in the working directory.
    pub fn symbols_file(self) -> String {
        format!("{}-symbols.json", self.id())
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.id() == id)
    }
}

impl fmt::Display for TargetRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
