//! Console implementations of the tutor's output ports.
//!
//! Steps render as emoji rows on stdout, sound cues as small markers. Keep
//! log output on stderr so the transcript stays readable.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use services::narration::{Narrator, NullAudioSink};
use services::ports::{
    CelebrationEffect, NullSpeakingIndicator, Renderer, SoundCue, SoundEffects,
};
use services::{NarrationError, TutorPorts};
use tutor_core::model::{QuizQuestion, Step, StepVisual};

/// Rows longer than this collapse to `{icon} × {count}`.
const MAX_DRAWN_ITEMS: u32 = 24;
/// Group stacks taller than this collapse to an "and more" line.
const MAX_DRAWN_GROUPS: u32 = 8;

/// Wires the console implementations into the tutor's ports.
///
/// The terminal has no audio device and no persistent speaking widget, so
/// those two ports get the null doubles.
#[must_use]
pub fn console_ports() -> TutorPorts {
    TutorPorts {
        renderer: Arc::new(ConsoleRenderer),
        narrator: Arc::new(ConsoleNarrator),
        audio: Arc::new(NullAudioSink),
        sounds: Arc::new(ConsoleSoundEffects),
        indicator: Arc::new(NullSpeakingIndicator),
        celebration: Arc::new(ConsoleCelebrationEffect),
    }
}

//
// ─── RENDERER ──────────────────────────────────────────────────────────────────
//

/// Draws steps, questions, and messages as plain stdout lines.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleRenderer;

impl Renderer for ConsoleRenderer {
    fn show_step(&self, step: &Step, position: usize, total: usize) {
        println!();
        println!("[{position}/{total}] {}", step.text());
        for line in visual_lines(step) {
            println!("    {line}");
        }
    }

    fn show_question(&self, question: &QuizQuestion, disabled: &[bool; 3]) {
        println!();
        println!("{} {}", question.icon(), question.text());
        for (index, (option, crossed)) in
            question.options().iter().zip(disabled.iter()).enumerate()
        {
            let marker = if *crossed { "  ✗" } else { "" };
            println!("    {}) {option}{marker}", index + 1);
        }
    }

    fn show_message(&self, text: &str) {
        println!();
        println!("{text}");
    }
}

fn visual_lines(step: &Step) -> Vec<String> {
    let icon = step.icon().unwrap_or("•");
    match step.visual() {
        StepVisual::Intro | StepVisual::Summary { .. } | StepVisual::Error => Vec::new(),
        StepVisual::Total { total } => vec![icon_row(icon, total)],
        StepVisual::Adding { initial, added } => {
            vec![format!("{}  +  {}", icon_row(icon, initial), icon_row(icon, added))]
        }
        StepVisual::TakingAway { initial, taken } => {
            let kept = initial.saturating_sub(taken);
            let mut line = icon_row(icon, kept);
            if taken > 0 {
                if !line.is_empty() {
                    line.push_str("  ");
                }
                line.push_str(&crossed_row(taken));
            }
            vec![line]
        }
        StepVisual::Groups {
            groups,
            items_per_group,
        } => group_rows(icon, groups, items_per_group),
        StepVisual::Grouping { total, group_size } => grouping_rows(icon, total, group_size),
        StepVisual::Result { value } => vec![format!("= {value}")],
    }
}

fn icon_row(icon: &str, count: u32) -> String {
    if count == 0 {
        return String::new();
    }
    if count > MAX_DRAWN_ITEMS {
        return format!("{icon} × {count}");
    }
    let mut row = String::new();
    for index in 0..count {
        if index > 0 {
            row.push(' ');
        }
        row.push_str(icon);
    }
    row
}

fn crossed_row(taken: u32) -> String {
    if taken > MAX_DRAWN_ITEMS {
        return format!("✗ × {taken}");
    }
    let mut row = String::new();
    for index in 0..taken {
        if index > 0 {
            row.push(' ');
        }
        row.push('✗');
    }
    row
}

fn group_rows(icon: &str, groups: u32, items_per_group: u32) -> Vec<String> {
    let drawn = groups.min(MAX_DRAWN_GROUPS);
    let mut rows = Vec::new();
    for _ in 0..drawn {
        rows.push(format!("[ {} ]", icon_row(icon, items_per_group)));
    }
    if groups > drawn {
        rows.push(format!("… and {} more groups", groups - drawn));
    }
    rows
}

fn grouping_rows(icon: &str, total: u32, group_size: u32) -> Vec<String> {
    if group_size == 0 {
        return Vec::new();
    }
    let mut rows = group_rows(icon, total / group_size, group_size);
    let leftover = total % group_size;
    if leftover > 0 {
        rows.push(format!("{}  ← left over", icon_row(icon, leftover)));
    }
    rows
}

//
// ─── NARRATOR ──────────────────────────────────────────────────────────────────
//

const PACE_PER_WORD: Duration = Duration::from_millis(120);
const MAX_PACE: Duration = Duration::from_secs(2);

/// The console's stand-in for a voice.
///
/// Prints nothing (the renderer already shows every line) but takes roughly
/// as long as reading the text aloud would, so play mode paces itself and an
/// interruption lands mid-step the way it would with sound on.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleNarrator;

#[async_trait]
impl Narrator for ConsoleNarrator {
    async fn speak(&self, text: &str) -> Result<(), NarrationError> {
        let words = u32::try_from(text.split_whitespace().count()).unwrap_or(u32::MAX);
        let pace = PACE_PER_WORD
            .checked_mul(words.max(1))
            .unwrap_or(MAX_PACE)
            .min(MAX_PACE);
        tokio::time::sleep(pace).await;
        Ok(())
    }

    async fn stop(&self) {}
}

//
// ─── EFFECTS ───────────────────────────────────────────────────────────────────
//

/// Prints a small marker for each feedback sound.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleSoundEffects;

impl SoundEffects for ConsoleSoundEffects {
    fn play(&self, cue: SoundCue) {
        let line = match cue {
            // A click fires on every answer press; keep it off the transcript.
            SoundCue::Click => return,
            SoundCue::Pop => "♪ pop",
            SoundCue::Correct => "♪ ding!",
            SoundCue::Wrong => "♪ buzz",
            SoundCue::Win => "♪ ta-da!",
        };
        println!("{line}");
    }
}

/// Prints a confetti line.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleCelebrationEffect;

impl CelebrationEffect for ConsoleCelebrationEffect {
    fn celebrate(&self) {
        println!();
        println!("🎉 ✨ 🎉 ✨ 🎉 ✨ 🎉");
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
