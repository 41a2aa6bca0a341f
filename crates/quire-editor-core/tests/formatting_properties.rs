//! Properties every selection-indexed transformation must hold.

use proptest::prelude::*;

use quire_editor_core::text::{
    apply_bold, apply_italic, insert_code_block, insert_link, prefix_at_start, wrap_selection,
};

fn char_slice(text: &str, start: usize, end: usize) -> String {
    text.chars().skip(start).take(end - start).collect()
}

/// A string plus an ordered, in-bounds `(start, end)` pair.
fn text_and_range() -> impl Strategy<Value = (String, usize, usize)> {
    ".{0,40}".prop_flat_map(|text| {
        let len = text.chars().count();
        (Just(text), 0..=len, 0..=len).prop_map(|(text, a, b)| (text, a.min(b), a.max(b)))
    })
}

proptest! {
    #[test]
    fn bold_adds_four_chars_around_selection((text, start, end) in text_and_range()) {
        let out = wrap_selection(&text, start, end, "**");
        let selected = char_slice(&text, start, end);
        prop_assert_eq!(out.chars().count(), text.chars().count() + 4);
        let needle = format!("**{selected}**");
        prop_assert!(out.contains(&needle), "{:?} not in {:?}", needle, out);
        prop_assert_eq!(out, apply_bold(&text, start, end));
    }

    #[test]
    fn italic_adds_two_chars_around_selection((text, start, end) in text_and_range()) {
        let out = wrap_selection(&text, start, end, "*");
        let selected = char_slice(&text, start, end);
        prop_assert_eq!(out.chars().count(), text.chars().count() + 2);
        let needle = format!("*{selected}*");
        prop_assert!(out.contains(&needle), "{:?} not in {:?}", needle, out);
        prop_assert_eq!(out, apply_italic(&text, start, end));
    }

    #[test]
    fn link_contains_selected_text_and_url(
        (text, start, end) in text_and_range(),
        url in "https://[a-z]{1,12}\\.io",
    ) {
        let out = insert_link(&text, start, end, &url);
        let selected = char_slice(&text, start, end);
        let needle = format!("[{selected}]({url})");
        prop_assert!(out.contains(&needle), "{:?} not in {:?}", needle, out);
        prop_assert_eq!(out.chars().count(), text.chars().count() + 4 + url.chars().count());
    }

    #[test]
    fn heading_prefix_sits_exactly_at_start((text, start, end) in text_and_range()) {
        let out = prefix_at_start(&text, start, end, "## ");
        let selected = char_slice(&text, start, end);
        let from_start: String = out.chars().skip(start).collect();
        let needle = format!("## {selected}");
        prop_assert!(from_start.starts_with(&needle), "{:?} not at {}", needle, start);
        prop_assert_eq!(char_slice(&out, 0, start), char_slice(&text, 0, start));
    }

    #[test]
    fn code_block_keeps_selection_verbatim(
        (text, start, end) in text_and_range(),
        language in "[a-z]{0,6}",
    ) {
        let out = insert_code_block(&text, start, end, &language);
        let selected = char_slice(&text, start, end);
        let needle = format!("\n```{language}\n{selected}\n```\n");
        prop_assert!(out.contains(&needle), "{:?} not in {:?}", needle, out);
        prop_assert_eq!(
            out.chars().count(),
            text.chars().count() + 10 + language.chars().count()
        );
    }

    #[test]
    fn input_is_never_mutated((text, start, end) in text_and_range()) {
        let before = text.clone();
        let _ = apply_bold(&text, start, end);
        let _ = insert_link(&text, start, end, "u");
        prop_assert_eq!(text, before);
    }
}

#[test]
fn documented_scenarios() {
    insta::assert_snapshot!(wrap_selection("Hello world", 0, 5, "**"), @"**Hello** world");
    insta::assert_snapshot!(wrap_selection("", 0, 0, "*"), @"**");
    insta::assert_snapshot!(
        insert_link("Click here", 0, 10, "https://x.io"),
        @"[Click here](https://x.io)"
    );
}
