//! Colored renderers for everything the console shows.
//!
//! These functions only format and print; all decisions about what to show
//! were made by the use cases.

use colored::Colorize;
use regex::RegexBuilder;

use flow_core::emotion::{EmotionAnalysis, WeightedEmotion, EMOTION_CHANNELS};
use flow_core::error::FlowError;
use flow_core::format::{format_clock, format_duration, format_file_size, format_timestamp};
use flow_core::journey::{JourneyBlock, JourneyDocument};
use flow_core::search::{MatchType, SearchHit};
use flow_core::session::Session;
use flow_core::story::{GeneratedStory, RenderOutcome, RenderedVideo, StoryBranch};
use flow_core::tags::Tag;
use flow_core::video::VideoRef;
use flow_core::workflow::{StageState, WorkflowState};

/// One line for a failed operation, preferring the text meant for users.
pub fn error_line(err: &FlowError) -> String {
    match err.user_message() {
        Some(message) => message.to_string(),
        None => err.to_string(),
    }
}

pub fn print_error(err: &FlowError) {
    println!("{}", error_line(err).red());
}

pub fn print_notification(text: &str) {
    println!("{}", text.bright_green());
}

pub fn session_line(session: &Session) -> String {
    format!("Signed in as {} <{}>", session.name, session.email)
}

/// The command reference shown by `/help`.
pub fn help() {
    let sections: [(&str, &[(&str, &str)]); 4] = [
        (
            "Account",
            &[
                ("/login <email> <password>", "Sign in"),
                ("/signup <email> <password> [name]", "Create an account"),
                ("/google <credential>", "Sign in with a Google credential token"),
                ("/logout", "Sign out"),
                ("/whoami", "Show the signed-in user"),
            ],
        ),
        (
            "Library",
            &[
                ("/archive [query]", "List stored videos, optionally filtered"),
                ("/find-all <query>", "Search your videos across the account"),
                ("/clear-search", "Back to the full listing"),
            ],
        ),
        (
            "Pipeline",
            &[
                ("/upload <file>", "Upload a video and make it active"),
                ("/transcribe", "Transcribe the active video"),
                ("/find <query>", "Search the transcript"),
                ("/jump <n>", "Jump the player to search hit n"),
                ("/video", "Show the active video's stored details"),
                ("/status", "Show where the pipeline stands"),
            ],
        ),
        (
            "AI",
            &[
                ("/tags", "Generate tags for the active video"),
                ("/emotions", "Analyze the emotional arc"),
                ("/story <prompt>", "Generate a story timeline"),
                ("/mode <tone>", "Story tone: normal, positive, negative, contrast"),
                ("/duration <seconds>", "Scene transition length (0-2s)"),
                ("/render", "Render the generated story"),
                ("/scene <n>", "Jump the player to story scene n"),
                ("/inspire <prompt>", "Generate a free-form story"),
                ("/inspire-mode <tone>", "Inspiration tone, e.g. Hopeful, Funny"),
                ("/journey", "Generate the emotional journey document"),
            ],
        ),
    ];

    for (heading, commands) in sections {
        println!("{}", heading.bright_magenta().bold());
        for (command, blurb) in commands {
            println!("  {:<34} {}", command.bright_cyan(), blurb.bright_black());
        }
    }
    println!("  {:<34} {}", "quit".bright_cyan(), "Leave".bright_black());
}

/// The library listing, one block per video.
pub fn video_listing(videos: &[VideoRef]) {
    if videos.is_empty() {
        println!("{}", "No videos stored yet.".bright_black());
        return;
    }
    println!(
        "{}",
        format!("{} video(s)", videos.len()).bright_magenta().bold()
    );
    for video in videos {
        video_card(video);
    }
}

/// One video's stored details.
pub fn video_card(video: &VideoRef) {
    let mut headline = format!("{}", video.filename.bold());
    if let Some(status) = &video.status {
        headline.push_str(&format!("  [{}]", status.as_str()).bright_black().to_string());
    }
    println!("{headline}");
    println!(
        "  {} {}  {} {}",
        "duration".bright_black(),
        format_duration(video.duration),
        "size".bright_black(),
        video
            .file_size
            .map(format_file_size)
            .unwrap_or_else(|| "Unknown".to_string()),
    );
    if let Some(created) = &video.created_at {
        println!("  {} {}", "added".bright_black(), created);
    }
    if let Some(score) = video.relevance_score {
        println!("  {} {:.0}%", "relevance".bright_black(), score * 100.0);
    }
    if let Some(preview) = &video.transcript_preview {
        if !preview.is_empty() {
            println!("  {}", preview.bright_black().italic());
        }
    }
    if let Some(tags) = &video.visual_tags {
        if !tags.is_empty() {
            let chips: Vec<String> = tags
                .iter()
                .map(|t| format!("#{t}").bright_magenta().to_string())
                .collect();
            println!("  {}", chips.join(" "));
        }
    }
}

/// Search hits with the query words highlighted, numbered for `/jump`.
pub fn search_hits(hits: &[SearchHit], query: &str) {
    if hits.is_empty() {
        println!("{}", "No matches.".bright_black());
        return;
    }
    println!(
        "{}",
        format!("{} match(es)", hits.len()).bright_magenta().bold()
    );
    for (index, hit) in hits.iter().enumerate() {
        let badge = match hit.match_type {
            MatchType::WordMatch => hit.match_type.label().bright_green(),
            MatchType::SentenceMatch => hit.match_type.label().bright_blue(),
        };
        println!(
            "{}. [{}] {}  {}",
            index + 1,
            badge,
            format!("{:.0}% match", hit.score * 100.0).bright_black(),
            format_timestamp(hit.start_time).cyan(),
        );
        println!("   {}", highlight_words(&hit.preview_text, query));
        if let Some(full) = &hit.full_text {
            if full != &hit.preview_text {
                println!("   {} {}", "Full phrase:".bright_black(), full);
            }
        }
        if let Some(word) = &hit.matched_word {
            println!(
                "   {}",
                format!("Matched word: \"{}\" at {}s", word, hit.start_time).bright_black()
            );
        }
    }
}

/// Wraps every occurrence of each query word in highlight styling.
/// Case-insensitive, and the words are taken literally.
pub fn highlight_words(text: &str, query: &str) -> String {
    let words: Vec<String> = query
        .split_whitespace()
        .filter(|w| !w.is_empty())
        .map(regex::escape)
        .collect();
    if words.is_empty() {
        return text.to_string();
    }
    let Ok(pattern) = RegexBuilder::new(&words.join("|"))
        .case_insensitive(true)
        .build()
    else {
        return text.to_string();
    };
    pattern
        .replace_all(text, |caps: &regex::Captures<'_>| {
            caps[0].yellow().bold().to_string()
        })
        .into_owned()
}

/// Tag chips with their confidence, already in display order.
pub fn tags(tags: &[Tag]) {
    if tags.is_empty() {
        println!("{}", "No tags came back.".bright_black());
        return;
    }
    for tag in tags {
        let chip = format!("#{}", tag.tag);
        let chip = if tag.source.is_text() {
            chip.bright_blue()
        } else {
            chip.bright_magenta()
        };
        println!(
            "  {} {}",
            chip,
            format!("{:.0}%", tag.effective_confidence() * 100.0).bright_black()
        );
    }
}

/// The emotional arc: one sparkline per channel plus the two summaries.
pub fn emotions(analysis: &EmotionAnalysis) {
    if analysis.is_demo() {
        println!("{}", "(illustrative dataset; analyzer unreachable)".yellow());
    }
    let series = analysis.chart_series();
    if !series.is_empty() {
        let span = format!(
            "{} - {}",
            format_timestamp(series[0].time),
            format_timestamp(series[series.len() - 1].time)
        );
        println!("{} {}", "Timeline".bright_magenta().bold(), span.bright_black());
        for channel in EMOTION_CHANNELS {
            let line: String = series.iter().map(|s| spark(s.level(channel))).collect();
            if line.chars().any(|c| c != ' ') {
                println!("  {:<8} {}", channel, line.bright_blue());
            }
        }
    }
    weighted_side("Good side", &analysis.good_side, true);
    weighted_side("Bad side", &analysis.bad_side, false);
}

fn weighted_side(heading: &str, emotions: &[WeightedEmotion], good: bool) {
    if emotions.is_empty() {
        return;
    }
    let heading = if good {
        heading.bright_green().bold()
    } else {
        heading.red().bold()
    };
    println!("{heading}");
    for emotion in emotions {
        println!("  {}: {}", emotion.label, emotion.score);
    }
}

/// One sparkline cell for an intensity in 0..=1.
fn spark(level: f64) -> char {
    const GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
    if level <= 0.0 {
        return ' ';
    }
    let slot = ((level * GLYPHS.len() as f64).ceil() as usize).clamp(1, GLYPHS.len());
    GLYPHS[slot - 1]
}

/// The generated story: numbered scenes, one panel per telling.
pub fn story(story: &GeneratedStory) {
    match story {
        GeneratedStory::Single(branch) => scene_panel(None, branch, 0),
        GeneratedStory::Contrast { positive, negative } => {
            scene_panel(Some("POSITIVE STORY".bright_green().bold()), positive, 0);
            scene_panel(
                Some("NEGATIVE STORY".red().bold()),
                negative,
                positive.scenes.len(),
            );
        }
    }
}

fn scene_panel(heading: Option<colored::ColoredString>, branch: &StoryBranch, offset: usize) {
    if let Some(heading) = heading {
        println!("{heading}");
    }
    if branch.scenes.is_empty() {
        println!("{}", "  (no scenes)".bright_black());
        return;
    }
    for (index, scene) in branch.scenes.iter().enumerate() {
        println!(
            "{}. [{} - {}] {}",
            offset + index + 1,
            format_timestamp(scene.start).cyan(),
            format_timestamp(scene.end).cyan(),
            scene.caption.bold(),
        );
        println!("   {}", scene.narration);
    }
    let narrative = branch.narrative();
    if !narrative.is_empty() {
        println!("{}", narrative.bright_black().italic());
    }
}

/// Rendered video locations, one per telling.
pub fn renders(outcome: &RenderOutcome) {
    match outcome {
        RenderOutcome::Single(video) => render_line(None, video),
        RenderOutcome::Contrast { positive, negative } => {
            render_line(Some("positive"), positive);
            render_line(Some("negative"), negative);
        }
    }
}

fn render_line(label: Option<&str>, video: &RenderedVideo) {
    match label {
        Some(label) => println!(
            "{} {}",
            format!("Rendered ({label}):").bright_green(),
            video.video_url.underline()
        ),
        None => println!(
            "{} {}",
            "Rendered:".bright_green(),
            video.video_url.underline()
        ),
    }
    if let Some(message) = &video.message {
        println!("  {}", message.bright_black());
    }
}

pub fn inspiration(text: &str) {
    if text.is_empty() {
        println!("{}", "The backend returned an empty story.".bright_black());
        return;
    }
    for line in text.lines() {
        println!("{}", line.bright_blue());
    }
}

/// The journey document, headings set off from body text.
pub fn journey(document: &JourneyDocument) {
    for block in document.blocks() {
        match block {
            JourneyBlock::Heading(text) => println!("{}", text.bright_magenta().bold()),
            JourneyBlock::Paragraph(text) => println!("{text}"),
        }
        println!();
    }
}

/// Where the pipeline stands: the step, every stage, and the selections.
pub fn status(
    state: &WorkflowState,
    backend_url: &str,
    session: Option<&Session>,
    playhead: Option<f64>,
) {
    println!("{} {}", "Backend".bright_black(), backend_url);
    match session {
        Some(session) => println!("{} {}", "Account".bright_black(), session.email),
        None => println!("{} {}", "Account".bright_black(), "not signed in".yellow()),
    }
    match &state.video {
        Some(video) => println!(
            "{} {} ({}, {})",
            "Video".bright_black(),
            video.filename.bold(),
            video.video_id,
            format_file_size(video.size_bytes),
        ),
        None => println!("{} {}", "Video".bright_black(), "none uploaded".yellow()),
    }
    println!("{} {} of 3", "Step".bright_black(), state.step.number());
    if let Some(seconds) = playhead {
        println!("{} {}", "Playhead".bright_black(), format_clock(seconds));
    }

    stage_line("upload", &state.upload);
    stage_line("transcription", &state.transcription);
    stage_line("search", &state.search);
    stage_line("tags", &state.tags);
    stage_line("emotions", &state.emotions);
    stage_line("story", &state.story);
    stage_line("render", &state.render);
    stage_line("inspiration", &state.inspiration);
    stage_line("journey", &state.journey);

    println!(
        "{} story={} transition={}s inspiration={}",
        "Modes".bright_black(),
        state.story_mode,
        state.transition_duration,
        state.inspiration_mode,
    );
}

fn stage_line<T>(name: &str, stage: &StageState<T>) {
    let rendered = match stage {
        StageState::Idle => "idle".bright_black(),
        StageState::Loading => "in progress".yellow(),
        StageState::Ready(_) => "done".bright_green(),
        StageState::Failed(message) => format!("failed: {message}").red(),
    };
    println!("  {:<14} {}", name, rendered);
}
