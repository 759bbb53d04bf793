// Glyph selection for navigate-to results
//
// Each glyph family occupies four consecutive slots: Public, Protected, Private,
// Internal. A declaration's glyph is its kind's public slot plus the access stride.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::symbols::{Accessibility, DeclaredSymbolKind};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GlyphFamily {
    Class,
    Constant,
    Delegate,
    Enum,
    EnumMember,
    Event,
    ExtensionMethod,
    Field,
    Interface,
    Method,
    Module,
    Property,
    Structure,
}

const FAMILIES: [GlyphFamily; 13] = [
    GlyphFamily::Class,
    GlyphFamily::Constant,
    GlyphFamily::Delegate,
    GlyphFamily::Enum,
    GlyphFamily::EnumMember,
    GlyphFamily::Event,
    GlyphFamily::ExtensionMethod,
    GlyphFamily::Field,
    GlyphFamily::Interface,
    GlyphFamily::Method,
    GlyphFamily::Module,
    GlyphFamily::Property,
    GlyphFamily::Structure,
];

const SLOTS_PER_FAMILY: u16 = 4;

/// Presentation glyph; `None` in results for kinds that have no glyph
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Glyph(u16);

impl Glyph {
    const fn public(family: GlyphFamily) -> Glyph {
        Glyph(family as u16 * SLOTS_PER_FAMILY)
    }

    /// Glyph for a declaration of `kind` with `accessibility`
    pub fn for_declaration(kind: DeclaredSymbolKind, accessibility: Accessibility) -> Option<Glyph> {
        let public = PUBLIC_GLYPHS[kind as usize]?;
        Some(Glyph(public.0 + access_stride(accessibility)))
    }

    pub fn family(self) -> GlyphFamily {
        FAMILIES[(self.0 / SLOTS_PER_FAMILY) as usize]
    }

    pub fn access(self) -> GlyphAccess {
        match self.0 % SLOTS_PER_FAMILY {
            0 => GlyphAccess::Public,
            1 => GlyphAccess::Protected,
            2 => GlyphAccess::Private,
            _ => GlyphAccess::Internal,
        }
    }

    pub fn index(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{:?}", self.family(), self.access())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlyphAccess {
    Public,
    Protected,
    Private,
    Internal,
}

fn access_stride(accessibility: Accessibility) -> u16 {
    match accessibility {
        Accessibility::Protected
        | Accessibility::ProtectedOrInternal
        | Accessibility::ProtectedAndInternal => 1,
        Accessibility::Private => 2,
        Accessibility::Internal => 3,
        Accessibility::Public | Accessibility::NotApplicable => 0,
    }
}

/// Indexed by `DeclaredSymbolKind as usize`; order must follow the enum.
const PUBLIC_GLYPHS: [Option<Glyph>; 18] = [
    Some(Glyph::public(GlyphFamily::Class)),           // Class
    Some(Glyph::public(GlyphFamily::Constant)),        // Constant
    Some(Glyph::public(GlyphFamily::Method)),          // Constructor
    Some(Glyph::public(GlyphFamily::Delegate)),        // Delegate
    Some(Glyph::public(GlyphFamily::Enum)),            // Enum
    Some(Glyph::public(GlyphFamily::EnumMember)),      // EnumMember
    Some(Glyph::public(GlyphFamily::Event)),           // Event
    Some(Glyph::public(GlyphFamily::ExtensionMethod)), // ExtensionMethod
    Some(Glyph::public(GlyphFamily::Field)),           // Field
    Some(Glyph::public(GlyphFamily::Property)),        // Indexer
    Some(Glyph::public(GlyphFamily::Interface)),       // Interface
    Some(Glyph::public(GlyphFamily::Method)),          // Method
    Some(Glyph::public(GlyphFamily::Module)),          // Module
    None,                                              // Namespace
    Some(Glyph::public(GlyphFamily::Property)),        // Property
    Some(Glyph::public(GlyphFamily::Class)),           // Record
    Some(Glyph::public(GlyphFamily::Structure)),       // RecordStruct
    Some(Glyph::public(GlyphFamily::Structure)),       // Struct
];
