#![allow(dead_code)]

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use widerlabel::wider::{BoundingBox, ImageDimensions};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(256);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

pub fn arb_dims() -> impl Strategy<Value = ImageDimensions> {
    (1u32..=8192, 1u32..=8192).prop_map(|(w, h)| ImageDimensions::new(w, h))
}

pub fn arb_bbox() -> impl Strategy<Value = BoundingBox> {
    (-500i32..10_000, -500i32..10_000, 0i32..5_000, 0i32..5_000)
        .prop_map(|(x, y, w, h)| BoundingBox::new(x, y, w, h))
}

/// A single box line as it might appear in a WIDER file.
#[derive(Clone, Debug)]
pub enum BoxLine {
    /// Four integers plus WIDER's trailing attribute flags.
    Valid(BoundingBox, Vec<u8>),
    /// Fewer than four tokens.
    Short(Vec<i32>),
    /// Four tokens, one of which is not an integer.
    NonInteger(usize),
}

impl BoxLine {
    pub fn render(&self) -> String {
        match self {
            BoxLine::Valid(bbox, flags) => {
                let mut line = bbox.to_string();
                for flag in flags {
                    line.push_str(&format!(" {flag}"));
                }
                line
            }
            BoxLine::Short(values) => values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" "),
            BoxLine::NonInteger(position) => {
                let mut tokens = vec!["1", "2", "3", "4"];
                tokens[*position] = "x";
                tokens.join(" ")
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, BoxLine::Valid(..))
    }
}

pub fn arb_box_line() -> impl Strategy<Value = BoxLine> {
    prop_oneof![
        4 => (arb_bbox(), prop::collection::vec(0u8..3, 0..7))
            .prop_map(|(bbox, flags)| BoxLine::Valid(bbox, flags)),
        1 => prop::collection::vec(-50i32..50, 0..4).prop_map(BoxLine::Short),
        1 => (0usize..4).prop_map(BoxLine::NonInteger),
    ]
}

/// One well-formed image block with a mix of valid and invalid box lines.
#[derive(Clone, Debug)]
pub struct Block {
    pub image: String,
    pub lines: Vec<BoxLine>,
}

impl Block {
    pub fn render(&self, out: &mut String) {
        out.push_str(&self.image);
        out.push('\n');
        out.push_str(&self.lines.len().to_string());
        out.push('\n');
        for line in &self.lines {
            out.push_str(&line.render());
            out.push('\n');
        }
    }
}

pub fn arb_block() -> impl Strategy<Value = Block> {
    (
        "[0-9]{1,2}--[A-Za-z]{1,8}",
        "[A-Za-z0-9_]{1,12}",
        prop_oneof![Just("jpg"), Just("JPG"), Just("jpeg")],
        prop::collection::vec(arb_box_line(), 0..6),
    )
        .prop_map(|(dir, stem, ext, lines)| Block {
            image: format!("{dir}/{stem}.{ext}"),
            lines,
        })
}

pub fn render_blocks(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        block.render(&mut out);
    }
    out
}
