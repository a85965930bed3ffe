// tests/segmentation_properties.rs
//! Integration tests for chunking and SSML rendering
//!
//! Checks the properties every caller relies on over a set of varied inputs:
//! chunks are bounded, trimmed, non-empty, and lose nothing but whitespace.

use narrator::segment::{
    MarkupConfig, SegmentationError, Segmenter, SegmenterConfig, TextKind, render, segment,
    to_markup,
};

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn sample_article() -> String {
    let paragraph = "The council met on Tuesday to discuss the new bridge. \
        Residents raised concerns about traffic, noise, and the timeline; \
        engineers answered most of them. Will the work start in spring? \
        Nobody could say for certain!";
    let mut text = String::new();
    for i in 0..12 {
        text.push_str(&format!("Section {}.\n{}\n\n", i, paragraph));
    }
    text
}

fn inputs() -> Vec<String> {
    vec![
        sample_article(),
        "word ".repeat(900),
        "x".repeat(1234),
        "Ünïcödé sentences with accents. ".repeat(80),
        "short line\n".repeat(300),
        "   padded at both ends.   ".to_string(),
    ]
}

#[test]
fn test_chunks_are_bounded_trimmed_and_non_empty() {
    for max_chars in [100, 250, 2500] {
        for text in inputs() {
            let chunks = segment(&text, max_chars).unwrap();
            assert!(!chunks.is_empty());
            for chunk in &chunks {
                assert!(!chunk.is_empty());
                assert_eq!(chunk.trim(), chunk);
                assert!(
                    chunk.chars().count() <= max_chars,
                    "chunk of {} chars exceeds {}",
                    chunk.chars().count(),
                    max_chars
                );
            }
        }
    }
}

#[test]
fn test_chunks_preserve_all_non_whitespace_content() {
    for text in inputs() {
        let chunks = segment(&text, 300).unwrap();
        assert_eq!(
            strip_whitespace(&chunks.concat()),
            strip_whitespace(&text)
        );
    }
}

/// Walk the chunks in order: each must be a verbatim prefix of what remains,
/// and only whitespace may sit between consecutive chunks.
fn assert_chunks_cover_in_order(text: &str, chunks: &[String]) {
    let mut remaining = text.trim();
    for (index, chunk) in chunks.iter().enumerate() {
        assert!(
            remaining.starts_with(chunk.as_str()),
            "chunk {} is not a prefix of the remaining text: {:?}",
            index,
            chunk
        );
        remaining = remaining[chunk.len()..].trim_start();
    }
    assert!(remaining.is_empty(), "text left over: {:?}", remaining);
}

#[test]
fn test_chunks_are_verbatim_slices_in_order() {
    let mut cases = inputs();
    cases.push("alpha  beta\tgamma.  ".repeat(200));
    for max_chars in [100, 300] {
        for text in &cases {
            let chunks = segment(text, max_chars).unwrap();
            assert_chunks_cover_in_order(text, &chunks);
        }
    }
}

#[test]
fn test_short_input_is_a_single_trimmed_chunk() {
    let chunks = segment("   padded at both ends.   ", 2500).unwrap();
    assert_eq!(chunks, vec!["padded at both ends."]);
}

#[test]
fn test_unbroken_text_is_cut_at_the_limit() {
    let chunks = segment(&"x".repeat(1234), 500).unwrap();
    let lengths: Vec<usize> = chunks.iter().map(|c| c.len()).collect();
    assert_eq!(lengths, vec![500, 500, 234]);
}

#[test]
fn test_sentence_punctuation_stays_with_its_chunk() {
    let text = sample_article();
    for chunk in segment(&text, 300).unwrap() {
        assert!(
            !chunk.starts_with('.') && !chunk.starts_with(',') && !chunk.starts_with(';'),
            "chunk starts with punctuation: {:?}",
            chunk
        );
    }
}

#[test]
fn test_blank_input_is_rejected() {
    assert_eq!(segment(" \n\t ", 2500), Err(SegmentationError::EmptyInput));
}

#[test]
fn test_limit_below_minimum_is_rejected() {
    let err = segment("some text", 50).unwrap_err();
    assert!(matches!(err, SegmentationError::InvalidLimit { max_chars: 50, .. }));
}

#[test]
fn test_full_ratio_only_cuts_at_the_limit_or_boundary_at_limit() {
    let segmenter = Segmenter::with_config(SegmenterConfig {
        max_chars: 100,
        boundary_ratio: 1.0,
    });
    let chunks = segmenter.split(&"word ".repeat(100)).unwrap();
    for chunk in &chunks {
        assert!(chunk.chars().count() <= 100);
    }
    assert_eq!(
        strip_whitespace(&chunks.concat()),
        strip_whitespace(&"word ".repeat(100))
    );
}

#[test]
fn test_every_chunk_renders_as_ssml() {
    for chunk in segment(&sample_article(), 400).unwrap() {
        let ssml = to_markup(&chunk).unwrap();
        assert!(ssml.starts_with("<speak><prosody rate=\"medium\">"));
        assert!(ssml.ends_with("</prosody></speak>"));
    }
}

#[test]
fn test_markup_escapes_and_paces_breaks() {
    let ssml = to_markup("Fish & chips\n\n<fresh>\nserved \"hot\"").unwrap();
    assert_eq!(
        ssml,
        "<speak><prosody rate=\"medium\">Fish &amp; chips<break time=\"800ms\"/>\
         &lt;fresh&gt;<break time=\"350ms\"/>served &quot;hot&quot;</prosody></speak>"
    );
}

#[test]
fn test_render_plain_and_ssml() {
    let config = MarkupConfig::default();

    let plain = render("  Hello there.  ", TextKind::Plain, &config).unwrap();
    assert_eq!(plain.body, "Hello there.");
    assert_eq!(plain.kind, TextKind::Plain);

    let ssml = render("Hello there.", TextKind::Ssml, &config).unwrap();
    assert_eq!(ssml.kind, TextKind::Ssml);
    assert!(ssml.body.contains("Hello there."));

    assert_eq!(
        render("   ", TextKind::Ssml, &config),
        Err(SegmentationError::EmptyChunk)
    );
}
