//! Which sections a task render includes.
//!
//! A [`ContentSelector`] is a set of [`ContentFlag`]s. Flags are independent
//! and every combination is valid; the order sections appear in is fixed by
//! [`ContentSelector::sections`], never by the order flags were inserted.
//!
//! ```rust
//! use blotter_core::content::{ContentFlag, ContentSelector, Section};
//!
//! let mut selector = ContentSelector::SHARING;
//! selector.remove(ContentFlag::LargeHeader);
//! selector.insert(ContentFlag::Header);
//!
//! assert_eq!(selector.sections().first(), Some(&Section::Header));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single selectable part of a task render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentFlag {
    /// One-line subheadline plus URL.
    Header,
    /// Status title, method and URL in large type.
    LargeHeader,
    /// Task summary section.
    TaskDetails,
    /// URL components section.
    RequestComponents,
    /// URL query items section.
    RequestQueryItems,
    /// Transport error section.
    ErrorDetails,
    /// Headers of the request as created.
    OriginalRequestHeaders,
    /// Headers of the request as sent.
    CurrentRequestHeaders,
    /// Request loading options.
    RequestOptions,
    /// Request body.
    RequestBody,
    /// Response headers.
    ResponseHeaders,
    /// Response body.
    ResponseBody,
}

impl ContentFlag {
    /// Every flag, in declaration order.
    pub const ALL: [Self; 12] = [
        Self::Header,
        Self::LargeHeader,
        Self::TaskDetails,
        Self::RequestComponents,
        Self::RequestQueryItems,
        Self::ErrorDetails,
        Self::OriginalRequestHeaders,
        Self::CurrentRequestHeaders,
        Self::RequestOptions,
        Self::RequestBody,
        Self::ResponseHeaders,
        Self::ResponseBody,
    ];

    const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// A section of a rendered task, in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// Compact header.
    Header,
    /// Large header.
    LargeHeader,
    /// Task summary.
    TaskDetails,
    /// Transport error.
    ErrorDetails,
    /// URL components.
    UrlComponents,
    /// URL query items.
    QueryItems,
    /// Request loading options.
    RequestOptions,
    /// Original and current request headers, each labeled.
    OriginalAndCurrentRequestHeaders,
    /// Original request headers under the generic title.
    OriginalRequestHeaders,
    /// Current request headers under the generic title.
    CurrentRequestHeaders,
    /// Request body.
    RequestBody,
    /// Response headers.
    ResponseHeaders,
    /// Response body.
    ResponseBody,
}

/// A set of [`ContentFlag`]s.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ContentSelector {
    bits: u16,
}

impl ContentSelector {
    /// No sections.
    pub const EMPTY: Self = Self { bits: 0 };

    /// The curated subset used for exports.
    pub const SHARING: Self = Self::from_flags(&[
        ContentFlag::LargeHeader,
        ContentFlag::TaskDetails,
        ContentFlag::ErrorDetails,
        ContentFlag::CurrentRequestHeaders,
        ContentFlag::RequestBody,
        ContentFlag::ResponseHeaders,
        ContentFlag::ResponseBody,
    ]);

    /// Everything a detail view shows. Uses the large header, not the compact one.
    pub const ALL: Self = Self::from_flags(&[
        ContentFlag::LargeHeader,
        ContentFlag::TaskDetails,
        ContentFlag::ErrorDetails,
        ContentFlag::RequestComponents,
        ContentFlag::RequestQueryItems,
        ContentFlag::OriginalRequestHeaders,
        ContentFlag::CurrentRequestHeaders,
        ContentFlag::RequestOptions,
        ContentFlag::RequestBody,
        ContentFlag::ResponseHeaders,
        ContentFlag::ResponseBody,
    ]);

    /// Build a selector from a list of flags.
    #[must_use]
    pub const fn from_flags(flags: &[ContentFlag]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < flags.len() {
            bits |= flags[i].bit();
            i += 1;
        }
        Self { bits }
    }

    /// Whether the flag is set.
    #[must_use]
    pub const fn contains(self, flag: ContentFlag) -> bool {
        self.bits & flag.bit() != 0
    }

    /// Set a flag.
    pub const fn insert(&mut self, flag: ContentFlag) {
        self.bits |= flag.bit();
    }

    /// Clear a flag.
    pub const fn remove(&mut self, flag: ContentFlag) {
        self.bits &= !flag.bit();
    }

    /// Copy with a flag set.
    #[must_use]
    pub const fn with(mut self, flag: ContentFlag) -> Self {
        self.insert(flag);
        self
    }

    /// Copy with a flag cleared.
    #[must_use]
    pub const fn without(mut self, flag: ContentFlag) -> Self {
        self.remove(flag);
        self
    }

    /// The set flags, in declaration order.
    pub fn flags(self) -> impl Iterator<Item = ContentFlag> {
        ContentFlag::ALL.into_iter().filter(move |flag| self.contains(*flag))
    }

    /// The sections the selector asks for, in render order.
    ///
    /// When both header flags are set the large header wins. Request headers
    /// resolve to one labeled pair when both original and current are set.
    #[must_use]
    pub fn sections(self) -> Vec<Section> {
        use ContentFlag as F;

        let mut sections = Vec::new();
        if self.contains(F::LargeHeader) {
            sections.push(Section::LargeHeader);
        } else if self.contains(F::Header) {
            sections.push(Section::Header);
        }
        let simple = [
            (F::TaskDetails, Section::TaskDetails),
            (F::ErrorDetails, Section::ErrorDetails),
            (F::RequestComponents, Section::UrlComponents),
            (F::RequestQueryItems, Section::QueryItems),
            (F::RequestOptions, Section::RequestOptions),
        ];
        sections.extend(
            simple
                .into_iter()
                .filter(|(flag, _)| self.contains(*flag))
                .map(|(_, section)| section),
        );
        match (
            self.contains(F::OriginalRequestHeaders),
            self.contains(F::CurrentRequestHeaders),
        ) {
            (true, true) => sections.push(Section::OriginalAndCurrentRequestHeaders),
            (true, false) => sections.push(Section::OriginalRequestHeaders),
            (false, true) => sections.push(Section::CurrentRequestHeaders),
            (false, false) => {},
        }
        let tail = [
            (F::RequestBody, Section::RequestBody),
            (F::ResponseHeaders, Section::ResponseHeaders),
            (F::ResponseBody, Section::ResponseBody),
        ];
        sections.extend(
            tail.into_iter()
                .filter(|(flag, _)| self.contains(*flag))
                .map(|(_, section)| section),
        );
        sections
    }

    /// Selector for a batch export of `count` entities.
    ///
    /// More than one entity switches the large header to the compact one.
    #[must_use]
    pub const fn for_sharing(count: usize) -> Self {
        if count > 1 {
            Self::SHARING
                .without(ContentFlag::LargeHeader)
                .with(ContentFlag::Header)
        } else {
            Self::SHARING
        }
    }
}

impl FromIterator<ContentFlag> for ContentSelector {
    fn from_iter<I: IntoIterator<Item = ContentFlag>>(iter: I) -> Self {
        let mut selector = Self::EMPTY;
        for flag in iter {
            selector.insert(flag);
        }
        selector
    }
}

impl fmt::Debug for ContentSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.flags()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sharing_preset() {
        let flags: Vec<_> = ContentSelector::SHARING.flags().collect();
        assert_eq!(
            flags,
            vec![
                ContentFlag::LargeHeader,
                ContentFlag::TaskDetails,
                ContentFlag::ErrorDetails,
                ContentFlag::CurrentRequestHeaders,
                ContentFlag::RequestBody,
                ContentFlag::ResponseHeaders,
                ContentFlag::ResponseBody,
            ]
        );
    }

    #[test]
    fn test_all_preset_has_every_section_flag() {
        for flag in ContentFlag::ALL {
            assert_eq!(
                ContentSelector::ALL.contains(flag),
                flag != ContentFlag::Header,
                "{flag:?}"
            );
        }
    }

    #[test]
    fn test_sections_follow_fixed_order() {
        let sections = ContentSelector::ALL.sections();
        assert_eq!(
            sections,
            vec![
                Section::LargeHeader,
                Section::TaskDetails,
                Section::ErrorDetails,
                Section::UrlComponents,
                Section::QueryItems,
                Section::RequestOptions,
                Section::OriginalAndCurrentRequestHeaders,
                Section::RequestBody,
                Section::ResponseHeaders,
                Section::ResponseBody,
            ]
        );
    }

    #[test]
    fn test_single_request_header_flag_maps_to_generic_section() {
        let original = ContentSelector::from_flags(&[ContentFlag::OriginalRequestHeaders]);
        let current = ContentSelector::from_flags(&[ContentFlag::CurrentRequestHeaders]);

        assert_eq!(original.sections(), vec![Section::OriginalRequestHeaders]);
        assert_eq!(current.sections(), vec![Section::CurrentRequestHeaders]);
    }

    #[test]
    fn test_for_sharing_downgrades_header_only_for_batches() {
        let single = ContentSelector::for_sharing(1);
        let batch = ContentSelector::for_sharing(2);

        assert!(single.contains(ContentFlag::LargeHeader));
        assert!(!single.contains(ContentFlag::Header));
        assert!(!batch.contains(ContentFlag::LargeHeader));
        assert!(batch.contains(ContentFlag::Header));
        assert_eq!(ContentSelector::for_sharing(0), ContentSelector::SHARING);
    }

    #[test]
    fn test_debug_lists_flag_names() {
        let selector = ContentSelector::from_flags(&[ContentFlag::Header]);
        assert_eq!(format!("{selector:?}"), "{Header}");
    }

    fn flag_strategy() -> impl Strategy<Value = ContentFlag> {
        (0..ContentFlag::ALL.len()).prop_map(|i| ContentFlag::ALL[i])
    }

    proptest! {
        #[test]
        fn test_insertion_order_does_not_matter(flags in prop::collection::vec(flag_strategy(), 0..12)) {
            let forward: ContentSelector = flags.iter().copied().collect();
            let backward: ContentSelector = flags.iter().rev().copied().collect();
            prop_assert_eq!(forward, backward);
            prop_assert_eq!(forward.sections(), backward.sections());
        }

        #[test]
        fn test_insert_then_contains(flag in flag_strategy()) {
            let mut selector = ContentSelector::EMPTY;
            selector.insert(flag);
            prop_assert!(selector.contains(flag));
            selector.remove(flag);
            prop_assert_eq!(selector, ContentSelector::EMPTY);
        }
    }
}
