// Declaration kinds and the navigate-to kind vocabulary
//
// One table maps every declaration kind to the coarse item kind callers filter on.
// Glyph selection (materialize::glyph) is keyed off the same enum.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Kind of a declared symbol as recorded in a document index
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum DeclaredSymbolKind {
    Class,
    Constant,
    Constructor,
    Delegate,
    Enum,
    EnumMember,
    Event,
    ExtensionMethod,
    Field,
    Indexer,
    Interface,
    Method,
    Module,
    /// Indexed for completeness but never reported by navigate-to
    Namespace,
    Property,
    Record,
    RecordStruct,
    Struct,
}

impl DeclaredSymbolKind {
    pub const ALL: [DeclaredSymbolKind; 18] = [
        DeclaredSymbolKind::Class,
        DeclaredSymbolKind::Constant,
        DeclaredSymbolKind::Constructor,
        DeclaredSymbolKind::Delegate,
        DeclaredSymbolKind::Enum,
        DeclaredSymbolKind::EnumMember,
        DeclaredSymbolKind::Event,
        DeclaredSymbolKind::ExtensionMethod,
        DeclaredSymbolKind::Field,
        DeclaredSymbolKind::Indexer,
        DeclaredSymbolKind::Interface,
        DeclaredSymbolKind::Method,
        DeclaredSymbolKind::Module,
        DeclaredSymbolKind::Namespace,
        DeclaredSymbolKind::Property,
        DeclaredSymbolKind::Record,
        DeclaredSymbolKind::RecordStruct,
        DeclaredSymbolKind::Struct,
    ];

    /// The navigate-to item kind this declaration reports as (`None` for namespaces)
    pub fn item_kind(self) -> Option<NavigateToItemKind> {
        ITEM_KIND_TABLE[self as usize]
    }
}

/// Indexed by `DeclaredSymbolKind as usize`; order must follow the enum.
const ITEM_KIND_TABLE: [Option<NavigateToItemKind>; 18] = [
    Some(NavigateToItemKind::Class),        // Class
    Some(NavigateToItemKind::Constant),     // Constant
    Some(NavigateToItemKind::Method),       // Constructor
    Some(NavigateToItemKind::Delegate),     // Delegate
    Some(NavigateToItemKind::Enum),         // Enum
    Some(NavigateToItemKind::EnumItem),     // EnumMember
    Some(NavigateToItemKind::Event),        // Event
    Some(NavigateToItemKind::Method),       // ExtensionMethod
    Some(NavigateToItemKind::Field),        // Field
    Some(NavigateToItemKind::Property),     // Indexer
    Some(NavigateToItemKind::Interface),    // Interface
    Some(NavigateToItemKind::Method),       // Method
    Some(NavigateToItemKind::Module),       // Module
    None,                                   // Namespace
    Some(NavigateToItemKind::Property),     // Property
    Some(NavigateToItemKind::Record),       // Record
    Some(NavigateToItemKind::RecordStruct), // RecordStruct
    Some(NavigateToItemKind::Structure),    // Struct
];

impl fmt::Display for DeclaredSymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeclaredSymbolKind::Class => "class",
            DeclaredSymbolKind::Constant => "constant",
            DeclaredSymbolKind::Constructor => "constructor",
            DeclaredSymbolKind::Delegate => "delegate",
            DeclaredSymbolKind::Enum => "enum",
            DeclaredSymbolKind::EnumMember => "enum_member",
            DeclaredSymbolKind::Event => "event",
            DeclaredSymbolKind::ExtensionMethod => "extension_method",
            DeclaredSymbolKind::Field => "field",
            DeclaredSymbolKind::Indexer => "indexer",
            DeclaredSymbolKind::Interface => "interface",
            DeclaredSymbolKind::Method => "method",
            DeclaredSymbolKind::Module => "module",
            DeclaredSymbolKind::Namespace => "namespace",
            DeclaredSymbolKind::Property => "property",
            DeclaredSymbolKind::Record => "record",
            DeclaredSymbolKind::RecordStruct => "record_struct",
            DeclaredSymbolKind::Struct => "struct",
        };
        f.write_str(name)
    }
}

/// Kinds a caller can ask navigate-to for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum NavigateToItemKind {
    Class,
    Structure,
    Interface,
    Delegate,
    Enum,
    EnumItem,
    Constant,
    Field,
    Method,
    Module,
    Property,
    Event,
    Record,
    RecordStruct,
}

impl NavigateToItemKind {
    pub const ALL: [NavigateToItemKind; 14] = [
        NavigateToItemKind::Class,
        NavigateToItemKind::Structure,
        NavigateToItemKind::Interface,
        NavigateToItemKind::Delegate,
        NavigateToItemKind::Enum,
        NavigateToItemKind::EnumItem,
        NavigateToItemKind::Constant,
        NavigateToItemKind::Field,
        NavigateToItemKind::Method,
        NavigateToItemKind::Module,
        NavigateToItemKind::Property,
        NavigateToItemKind::Event,
        NavigateToItemKind::Record,
        NavigateToItemKind::RecordStruct,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NavigateToItemKind::Class => "class",
            NavigateToItemKind::Structure => "struct",
            NavigateToItemKind::Interface => "interface",
            NavigateToItemKind::Delegate => "delegate",
            NavigateToItemKind::Enum => "enum",
            NavigateToItemKind::EnumItem => "enum_item",
            NavigateToItemKind::Constant => "constant",
            NavigateToItemKind::Field => "field",
            NavigateToItemKind::Method => "method",
            NavigateToItemKind::Module => "module",
            NavigateToItemKind::Property => "property",
            NavigateToItemKind::Event => "event",
            NavigateToItemKind::Record => "record",
            NavigateToItemKind::RecordStruct => "record_struct",
        }
    }
}

impl fmt::Display for NavigateToItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NavigateToItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "class" => Ok(NavigateToItemKind::Class),
            "struct" | "structure" => Ok(NavigateToItemKind::Structure),
            "interface" => Ok(NavigateToItemKind::Interface),
            "delegate" => Ok(NavigateToItemKind::Delegate),
            "enum" => Ok(NavigateToItemKind::Enum),
            "enum_item" | "enum_member" => Ok(NavigateToItemKind::EnumItem),
            "constant" | "const" => Ok(NavigateToItemKind::Constant),
            "field" => Ok(NavigateToItemKind::Field),
            "method" => Ok(NavigateToItemKind::Method),
            "module" => Ok(NavigateToItemKind::Module),
            "property" => Ok(NavigateToItemKind::Property),
            "event" => Ok(NavigateToItemKind::Event),
            "record" => Ok(NavigateToItemKind::Record),
            "record_struct" => Ok(NavigateToItemKind::RecordStruct),
            other => Err(format!("unknown navigate-to kind '{}'", other)),
        }
    }
}

/// Set of item kinds a search asked for
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct KindFilter {
    kinds: HashSet<NavigateToItemKind>,
}

impl KindFilter {
    pub fn new(kinds: impl IntoIterator<Item = NavigateToItemKind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
        }
    }

    /// Every kind in the vocabulary
    pub fn all() -> Self {
        Self::new(NavigateToItemKind::ALL)
    }

    /// Parse a comma-separated list such as `class,struct,method`
    pub fn parse_list(list: &str) -> Result<Self, String> {
        list.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(NavigateToItemKind::from_str)
            .collect::<Result<HashSet<_>, _>>()
            .map(|kinds| Self { kinds })
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn contains(&self, kind: NavigateToItemKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Item kind to report for `kind`, or `None` when it must be skipped
    pub fn accepts(&self, kind: DeclaredSymbolKind) -> Option<NavigateToItemKind> {
        kind.item_kind().filter(|item_kind| self.kinds.contains(item_kind))
    }

    /// Kinds in a stable order, for logging and wire requests
    pub fn sorted(&self) -> Vec<NavigateToItemKind> {
        let mut kinds: Vec<_> = self.kinds.iter().copied().collect();
        kinds.sort();
        kinds
    }
}

impl FromIterator<NavigateToItemKind> for KindFilter {
    fn from_iter<I: IntoIterator<Item = NavigateToItemKind>>(iter: I) -> Self {
        Self::new(iter)
    }
}
