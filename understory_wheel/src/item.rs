// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The capability wheel items need: producing the text shown on their row.

use alloc::borrow::Cow;
use alloc::string::String;

/// A value that can be shown on a wheel row.
pub trait WheelItem {
    /// Text painted for this item.
    fn show_text(&self) -> Cow<'_, str>;
}

impl WheelItem for str {
    fn show_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl WheelItem for String {
    fn show_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl WheelItem for Cow<'_, str> {
    fn show_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_ref())
    }
}

impl<T: WheelItem + ?Sized> WheelItem for &T {
    fn show_text(&self) -> Cow<'_, str> {
        (**self).show_text()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::WheelItem;

    struct Range {
        lo: u32,
        hi: u32,
    }

    impl WheelItem for Range {
        fn show_text(&self) -> alloc::borrow::Cow<'_, str> {
            alloc::format!("{}-{}", self.lo, self.hi).into()
        }
    }

    #[test]
    fn strings_and_custom_items_produce_text() {
        assert_eq!("A".show_text(), "A");
        assert_eq!(String::from("B").show_text(), "B");
        assert_eq!(Range { lo: 10, hi: 20 }.show_text(), "10-20");
    }
}
