#![forbid(unsafe_code)]

//! The demo page: a tall document of headings and reveal lists laid out on
//! a [`Stage`], plus a plain-text renderer for whatever the viewport shows.

use std::time::Duration;

use glyphfall::reveal::{DEFAULT_ITEM_DURATION, DEFAULT_REVEAL_MARGIN, DEFAULT_STAGGER_INTERVAL};
use glyphfall::{ElementId, Rect, RevealPhase, RevealSchedule, ScrambleConfig, Stage, TriggerMode};

use crate::cli::Opts;

/// Total document height in rows.
pub const DOCUMENT_ROWS: u16 = 96;

/// Left margin of every block.
const INDENT: u16 = 4;

/// Rows per reveal list entry.
const ITEM_PITCH: u16 = 2;

struct Heading {
    id: u64,
    row: u16,
    text: &'static str,
    mode: TriggerMode,
    delay_ms: u64,
}

const fn heading(
    id: u64,
    row: u16,
    text: &'static str,
    mode: TriggerMode,
    delay_ms: u64,
) -> Heading {
    Heading {
        id,
        row,
        text,
        mode,
        delay_ms,
    }
}

const HEADINGS: &[Heading] = &[
    heading(1, 1, "DESIGNER / DEVELOPER", TriggerMode::Load, 0),
    heading(2, 3, "building small tools for large terminals", TriggerMode::Load, 400),
    heading(3, 30, "SELECTED WORK", TriggerMode::Scroll, 0),
    heading(5, 50, "SKILLS", TriggerMode::Scroll, 200),
    heading(7, 70, "HOVER TO REPLAY", TriggerMode::Hover, 0),
    heading(8, 80, "GET IN TOUCH", TriggerMode::Hover, 0),
    heading(9, 88, "THANKS FOR SCROLLING", TriggerMode::Scroll, 0),
];

const LISTS: &[(u64, u16, &[&str])] = &[
    (
        4,
        33,
        &[
            "frame-accurate log viewer",
            "tiny wire codec with zero copies",
            "incremental layout solver",
            "terminal font atlas generator",
            "deterministic replay harness",
        ],
    ),
    (
        6,
        53,
        &[
            "Rust, async and otherwise",
            "parsers and codecs",
            "terminal rendering",
            "property testing",
        ],
    ),
];

#[derive(Debug)]
enum Body {
    Heading,
    Items(&'static [&'static str]),
}

#[derive(Debug)]
struct Block {
    element: ElementId,
    body: Body,
}

/// Layout of everything mounted on the demo stage.
#[derive(Debug)]
pub struct Page {
    blocks: Vec<Block>,
}

/// Viewport rows left once the status line is reserved.
pub fn viewport_rows(terminal_rows: u16) -> u16 {
    terminal_rows.saturating_sub(1).max(1)
}

/// Mount the page on a fresh stage showing `width` x `height` rows.
///
/// # Errors
///
/// A scramble configuration rejected by the engine, e.g. a non-positive
/// speed from the command line.
pub fn build(opts: &Opts, width: u16, height: u16) -> glyphfall::Result<(Stage, Page)> {
    let mut stage = Stage::new(Rect::from_size(width, height));
    let mut blocks = Vec::with_capacity(HEADINGS.len() + LISTS.len());

    for heading in HEADINGS {
        let element = ElementId::new(heading.id);
        let rect = Rect::new(INDENT, heading.row, text_width(heading.text), 1);
        let mut config = ScrambleConfig::new(heading.mode)
            .speed(opts.speed)
            .delay(Duration::from_millis(heading.delay_ms));
        if let Some(seed) = opts.seed {
            config = config.seed(seed.wrapping_add(heading.id));
        }
        stage.add_scramble(element, rect, heading.text, &config)?;
        blocks.push(Block {
            element,
            body: Body::Heading,
        });
    }

    for &(id, row, items) in LISTS {
        let element = ElementId::new(id);
        let widest = items.iter().map(|s| text_width(s)).max().unwrap_or(0);
        let rows = u16::try_from(items.len()).unwrap_or(u16::MAX);
        let rect = Rect::new(
            INDENT,
            row,
            widest.saturating_add(2),
            rows.saturating_mul(ITEM_PITCH),
        );
        let schedule = RevealSchedule::uniform(
            items.len(),
            Duration::ZERO,
            DEFAULT_STAGGER_INTERVAL,
            DEFAULT_ITEM_DURATION,
        );
        stage.add_reveal(element, rect, schedule, DEFAULT_REVEAL_MARGIN);
        blocks.push(Block {
            element,
            body: Body::Items(items),
        });
    }

    let page = Page { blocks };
    page.relayout(&mut stage);
    tracing::debug!(blocks = page.blocks.len(), width, height, "demo page mounted");
    Ok((stage, page))
}

/// Column for a block `block_width` wide in a viewport `view_width` wide:
/// indented when both margins fit, flush left otherwise.
fn block_column(block_width: u16, view_width: u16) -> u16 {
    let indented = block_width.saturating_add(INDENT.saturating_mul(2));
    if indented <= view_width { INDENT } else { 0 }
}

impl Page {
    /// Deepest scroll offset for the stage's current viewport.
    pub fn max_scroll(&self, stage: &Stage) -> u16 {
        DOCUMENT_ROWS.saturating_sub(stage.viewport().height)
    }

    /// Scroll by `delta` rows, kept within the document.
    pub fn scroll_by(&self, stage: &mut Stage, delta: i32) {
        stage.scroll_by(delta);
        self.clamp_scroll(stage);
    }

    /// Jump to the bottom of the document.
    pub fn scroll_to_end(&self, stage: &mut Stage) {
        stage.scroll_to(self.max_scroll(stage));
    }

    /// Re-place every block for the stage's current viewport width.
    pub fn relayout(&self, stage: &mut Stage) {
        let view_width = stage.viewport().width;
        for block in &self.blocks {
            let Some(rect) = stage.layout(block.element) else {
                continue;
            };
            let x = block_column(rect.width, view_width);
            if x != rect.x {
                stage.move_element(block.element, Rect { x, ..rect });
            }
        }
    }

    /// Pull the viewport back inside the document after a resize.
    pub fn clamp_scroll(&self, stage: &mut Stage) {
        let max = self.max_scroll(stage);
        if stage.viewport().top() > max {
            stage.scroll_to(max);
        }
    }

    /// One full-width line per viewport row.
    pub fn render(&self, stage: &Stage) -> Vec<String> {
        let view = stage.viewport();
        let mut rows = vec![vec![' '; usize::from(view.width)]; usize::from(view.height)];

        for block in &self.blocks {
            let Some(rect) = stage.layout(block.element) else {
                continue;
            };
            match block.body {
                Body::Heading => {
                    if let Some(text) = stage.text(block.element) {
                        put(&mut rows, view, rect.x, rect.y, text);
                    }
                }
                Body::Items(items) => {
                    let Some(group) = stage.reveal(block.element) else {
                        continue;
                    };
                    for (i, item) in items.iter().enumerate() {
                        let shown = visible_prefix(item, group.phase(i));
                        if shown.is_empty() {
                            continue;
                        }
                        let pitch = u16::try_from(i).unwrap_or(u16::MAX);
                        let y = rect.y.saturating_add(pitch.saturating_mul(ITEM_PITCH));
                        put(&mut rows, view, rect.x, y, &format!("- {shown}"));
                    }
                }
            }
        }

        rows.into_iter().map(String::from_iter).collect()
    }

    /// Status line text, padded to the viewport width.
    pub fn status_line(&self, stage: &Stage) -> String {
        let state = if stage.is_idle() { "idle" } else { "animating" };
        let line = format!(
            " row {}/{}  frame {}  {}  q quit",
            stage.viewport().top(),
            self.max_scroll(stage),
            stage.frame_count(),
            state,
        );
        let width = usize::from(stage.viewport().width);
        let mut chars: Vec<char> = line.chars().take(width).collect();
        chars.resize(width, ' ');
        chars.into_iter().collect()
    }
}

/// Characters of `text` shown at `phase`: nothing before the item starts,
/// a growing prefix while it eases in, everything once revealed.
fn visible_prefix(text: &str, phase: RevealPhase) -> String {
    let count = text.chars().count();
    let shown = match phase {
        RevealPhase::Hidden | RevealPhase::Waiting => 0,
        RevealPhase::Revealing(amount) => {
            ((amount.clamp(0.0, 1.0) * count as f32).ceil() as usize).min(count)
        }
        RevealPhase::Revealed => count,
    };
    text.chars().take(shown).collect()
}

fn text_width(text: &str) -> u16 {
    u16::try_from(text.chars().count()).unwrap_or(u16::MAX)
}

fn put(rows: &mut [Vec<char>], view: Rect, x: u16, y: u16, text: &str) {
    if y < view.top() || y >= view.bottom() {
        return;
    }
    let Some(row) = rows.get_mut(usize::from(y - view.top())) else {
        return;
    };
    for (col, ch) in (usize::from(x)..).zip(text.chars()) {
        let Some(cell) = row.get_mut(col) else {
            break;
        };
        *cell = ch;
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn render_always_fills_the_viewport(
            width in 1u16..160,
            height in 1u16..60,
            scrolls in proptest::collection::vec(-40i32..40, 0..6),
            frames in 0usize..80,
        ) {
            let opts = Opts {
                seed: Some(1),
                ..Opts::default()
            };
            let (mut stage, page) = build(&opts, width, height).unwrap();
            for delta in scrolls {
                page.scroll_by(&mut stage, delta);
                for _ in 0..frames / 6 + 1 {
                    stage.advance(Duration::from_millis(16));
                }
            }
            prop_assert!(stage.viewport().top() <= page.max_scroll(&stage));
            let lines = page.render(&stage);
            prop_assert_eq!(lines.len(), usize::from(height));
            for line in &lines {
                prop_assert_eq!(line.chars().count(), usize::from(width));
            }
        }
    }
}
