//! Property tests for the legal-text segmenter.

use contract_rag::Segmenter;
use proptest::prelude::*;

/// Characters a generated document may contain: structure markers,
/// punctuation, CJK body text, and ASCII.
fn arb_text(max_len: usize) -> impl Strategy<Value = String> {
    let alphabet = proptest::sample::select(vec![
        '第', '条', '章', '合', '同', '甲', '乙', '双', '方', '货', '物', '交', '付', '。', '，',
        '；', '\n', ' ', 'a', 'b', '1', '2',
    ]);
    proptest::collection::vec(alphabet, 0..max_len).prop_map(String::from_iter)
}

/// *For any* text, `length_split` output covers the whole input: the first
/// chunk starts at position 0, each later chunk repeats exactly `overlap`
/// trailing characters of its predecessor, and stripping that lead-in and
/// concatenating reconstructs the original text.
mod prop_length_split_coverage {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn reconstructs_original_text(text in arb_text(400)) {
            let overlap = 5;
            let segmenter = Segmenter::new(10, 50, overlap);
            let chunks = segmenter.length_split(&text);

            let mut rebuilt = String::new();
            for (i, chunk) in chunks.iter().enumerate() {
                if i == 0 {
                    rebuilt.push_str(chunk);
                } else {
                    let chars: Vec<char> = chunk.chars().collect();
                    prop_assert!(chars.len() > overlap, "non-first chunk shorter than overlap");
                    rebuilt.extend(&chars[overlap..]);
                }
            }
            prop_assert_eq!(rebuilt, text);
        }

        #[test]
        fn adjacent_chunks_share_overlap(text in arb_text(400)) {
            let overlap = 5;
            let segmenter = Segmenter::new(10, 50, overlap);
            let chunks = segmenter.length_split(&text);

            for pair in chunks.windows(2) {
                let prev: Vec<char> = pair[0].chars().collect();
                let next: Vec<char> = pair[1].chars().collect();
                let tail: String = prev[prev.len() - overlap..].iter().collect();
                let head: String = next[..overlap].iter().collect();
                prop_assert_eq!(tail, head);
            }
        }

        #[test]
        fn short_text_is_single_chunk(text in arb_text(50)) {
            let segmenter = Segmenter::new(10, 50, 5);
            let chunks = segmenter.length_split(&text);
            prop_assert_eq!(chunks.len(), 1);
            prop_assert_eq!(&chunks[0], &text);
        }
    }
}

/// *For any* text, `smart_segment` never produces a chunk longer than
/// `max_length` characters, and `structure_split` never produces a chunk
/// shorter than `min_length`.
mod prop_segment_bounds {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn smart_segment_respects_max_length(text in arb_text(600)) {
            let segmenter = Segmenter::new(10, 50, 5);
            for chunk in segmenter.smart_segment(&text) {
                prop_assert!(chunk.chars().count() <= 50);
            }
        }

        #[test]
        fn structure_split_respects_min_length(text in arb_text(600)) {
            let segmenter = Segmenter::new(10, 50, 5);
            for chunk in segmenter.structure_split(&text) {
                prop_assert!(chunk.chars().count() >= 10);
            }
        }
    }
}

#[test]
fn structure_split_splits_at_article_lines() {
    let segmenter = Segmenter::new(10, 50, 5);
    let text = "第一条 总则\n本合同由甲乙双方签订，经协商一致自愿签署。\n第二条 定义\n本合同所称货物是指附件所列全部设备与配件。";
    let chunks = segmenter.structure_split(text);

    assert_eq!(chunks.len(), 2);
    assert!(chunks[0].contains("第一条"));
    assert!(chunks[1].contains("第二条"));
    for chunk in &chunks {
        assert!(chunk.chars().count() >= 10);
    }
}

#[test]
fn smart_segment_preserves_document_order() {
    let segmenter = Segmenter::new(10, 50, 5);
    let text = format!(
        "第一条 交付\n{}\n第二条 验收\n货物到达后甲方应当在七日内完成验收并书面确认。",
        "卖方应当按照约定时间和地点交付货物，".repeat(10)
    );
    let chunks = segmenter.smart_segment(&text);

    // The oversized first article is windowed; the second stays whole and last.
    assert!(chunks.len() > 2);
    assert!(chunks[0].starts_with("第一条"));
    assert!(chunks.last().unwrap().contains("第二条"));
}

#[test]
fn whitespace_only_input_yields_nothing() {
    let segmenter = Segmenter::new(10, 50, 5);
    assert!(segmenter.structure_split(" \n \n ").is_empty());
    assert!(segmenter.smart_segment(" \n \n ").is_empty());
}
