//! Command dispatch: one slash command per operation the client offers.

use std::path::Path;
use std::sync::Arc;

use colored::Colorize;

use flow_application::workflow_usecase::{
    EMOTIONS_NOTIFICATION, NO_FILE_SELECTED_MESSAGE, TAGS_NOTIFICATION, UPLOADED_NOTIFICATION,
};
use flow_application::{ArchiveUseCase, AuthOutcome, AuthUseCase, SessionUseCase, WorkflowUseCase};
use flow_core::format::format_file_size;
use flow_core::session::display_name_from_email;
use flow_core::story::{InspirationMode, StoryMode};

use crate::display;
use crate::player::ConsolePlayer;

/// Every command the console accepts, in `/help` order. The readline
/// completer draws from this list.
pub const COMMANDS: [&str; 25] = [
    "/login",
    "/signup",
    "/google",
    "/logout",
    "/whoami",
    "/archive",
    "/find-all",
    "/clear-search",
    "/upload",
    "/transcribe",
    "/find",
    "/jump",
    "/video",
    "/status",
    "/tags",
    "/emotions",
    "/story",
    "/mode",
    "/duration",
    "/render",
    "/scene",
    "/inspire",
    "/inspire-mode",
    "/journey",
    "/help",
];

/// The wired-up console: owns the use cases and routes input lines to them.
pub struct App {
    backend_url: String,
    auth: Arc<AuthUseCase>,
    sessions: Arc<SessionUseCase>,
    archive: Arc<ArchiveUseCase>,
    workflow: Arc<WorkflowUseCase>,
    player: Arc<ConsolePlayer>,
}

impl App {
    pub fn new(
        backend_url: String,
        auth: Arc<AuthUseCase>,
        sessions: Arc<SessionUseCase>,
        archive: Arc<ArchiveUseCase>,
        workflow: Arc<WorkflowUseCase>,
        player: Arc<ConsolePlayer>,
    ) -> Self {
        Self {
            backend_url,
            auth,
            sessions,
            archive,
            workflow,
            player,
        }
    }

    /// Printed once at startup, before the first prompt.
    pub async fn show_session_banner(&self) {
        match self.sessions.current().await {
            Ok(Some(session)) => {
                println!("{}", display::session_line(&session).bright_green());
            }
            Ok(None) => {
                println!(
                    "{}",
                    "Not signed in. Use /login or /signup.".bright_black()
                );
            }
            Err(err) => {
                println!(
                    "{}",
                    format!("Stored session could not be read: {err}").yellow()
                );
            }
        }
    }

    /// Routes one input line. Unknown commands get a pointer to `/help`.
    pub async fn dispatch(&self, line: &str) {
        let (command, rest) = split_command(line);
        match command {
            "/login" => self.login(rest).await,
            "/signup" => self.signup(rest).await,
            "/google" => self.google(rest).await,
            "/logout" => self.logout().await,
            "/whoami" => self.whoami().await,
            "/archive" => self.archive(rest).await,
            "/find-all" => self.find_all(rest).await,
            "/clear-search" => self.clear_search().await,
            "/upload" => self.upload(rest).await,
            "/transcribe" => self.transcribe().await,
            "/find" => self.find(rest).await,
            "/jump" => self.jump(rest).await,
            "/scene" => self.scene(rest).await,
            "/video" => self.video().await,
            "/status" => self.status().await,
            "/tags" => self.tags().await,
            "/emotions" => self.emotions().await,
            "/story" => self.story(rest).await,
            "/mode" => self.mode(rest).await,
            "/duration" => self.duration(rest).await,
            "/render" => self.render().await,
            "/inspire" => self.inspire(rest).await,
            "/inspire-mode" => self.inspire_mode(rest).await,
            "/journey" => self.journey().await,
            "/help" => display::help(),
            _ => println!(
                "{}",
                "Unknown command. Type '/help' for the list.".bright_black()
            ),
        }
    }

    async fn login(&self, rest: &str) {
        let Some((email, password)) = rest.split_once(char::is_whitespace) else {
            usage("/login <email> <password>");
            return;
        };
        match self.auth.sign_in(email.trim(), password.trim()).await {
            Ok(session) => {
                println!("{}", format!("Welcome back, {}!", session.name).bright_green());
            }
            Err(err) => display::print_error(&err),
        }
    }

    async fn signup(&self, rest: &str) {
        let mut parts = rest.split_whitespace();
        let (Some(email), Some(password)) = (parts.next(), parts.next()) else {
            usage("/signup <email> <password> [name]");
            return;
        };
        let name = parts.collect::<Vec<_>>().join(" ");
        // Without an explicit name the backend gets the email prefix, the
        // same default the local session would use.
        let name = if name.is_empty() {
            display_name_from_email(email).to_string()
        } else {
            name
        };
        match self.auth.sign_up(email, &name, password).await {
            Ok(AuthOutcome::SignedIn(session)) => {
                println!("{}", format!("Welcome, {}!", session.name).bright_green());
            }
            Ok(AuthOutcome::DuplicateEmail) => {
                println!(
                    "{}",
                    flow_application::auth_usecase::DUPLICATE_EMAIL_MESSAGE.yellow()
                );
            }
            Err(err) => display::print_error(&err),
        }
    }

    async fn google(&self, rest: &str) {
        if rest.is_empty() {
            usage("/google <credential>");
            return;
        }
        match self.auth.federated_sign_in(rest).await {
            Ok(session) => {
                println!("{}", format!("Welcome, {}!", session.name).bright_green());
            }
            Err(err) => display::print_error(&err),
        }
    }

    async fn logout(&self) {
        match self.sessions.sign_out().await {
            Ok(()) => println!("{}", "Signed out.".bright_green()),
            Err(err) => display::print_error(&err),
        }
    }

    async fn whoami(&self) {
        match self.sessions.current().await {
            Ok(Some(session)) => {
                println!("{}", display::session_line(&session));
                if !session.picture_url.is_empty() {
                    println!("{}", session.picture_url.bright_black());
                }
            }
            Ok(None) => println!("{}", "Not signed in.".yellow()),
            Err(err) => display::print_error(&err),
        }
    }

    /// `/archive` lists everything; `/archive <query>` filters the listing.
    async fn archive(&self, rest: &str) {
        let outcome = if rest.is_empty() {
            self.archive.load_videos().await
        } else {
            self.archive.search(rest).await
        };
        match outcome {
            Ok(videos) => display::video_listing(&videos),
            Err(err) => display::print_error(&err),
        }
    }

    /// Account-scoped search across every uploaded video.
    async fn find_all(&self, rest: &str) {
        match self.workflow.global_search(rest).await {
            Ok(videos) => display::video_listing(&videos),
            Err(err) => display::print_error(&err),
        }
    }

    async fn clear_search(&self) {
        let videos = self.archive.clear_search().await;
        display::video_listing(&videos);
    }

    async fn upload(&self, rest: &str) {
        if rest.is_empty() {
            println!("{}", NO_FILE_SELECTED_MESSAGE.red());
            return;
        }
        match self.workflow.upload(Path::new(rest)).await {
            Ok(video) => {
                display::print_notification(UPLOADED_NOTIFICATION);
                println!(
                    "{}",
                    format!(
                        "{} ({}) as {}",
                        video.filename,
                        format_file_size(video.size_bytes),
                        video.video_id
                    )
                    .bright_black()
                );
            }
            Err(err) => display::print_error(&err),
        }
    }

    async fn transcribe(&self) {
        match self.workflow.transcribe().await {
            Ok(transcript) => {
                println!("{}", "Transcript".bright_magenta().bold());
                println!("{transcript}");
            }
            Err(err) => display::print_error(&err),
        }
    }

    async fn find(&self, rest: &str) {
        match self.workflow.search_transcript(rest).await {
            Ok(hits) => display::search_hits(&hits, rest),
            Err(err) => display::print_error(&err),
        }
    }

    async fn jump(&self, rest: &str) {
        let Some(index) = parse_index(rest) else {
            usage("/jump <result number>");
            return;
        };
        match self.workflow.jump_to_hit(index).await {
            Ok(message) => println!("{message}"),
            Err(err) => display::print_error(&err),
        }
    }

    async fn scene(&self, rest: &str) {
        let Some(index) = parse_index(rest) else {
            usage("/scene <scene number>");
            return;
        };
        match self.workflow.jump_to_scene(index).await {
            Ok(message) => println!("{message}"),
            Err(err) => display::print_error(&err),
        }
    }

    async fn video(&self) {
        match self.workflow.current_video_details().await {
            Ok(video) => display::video_card(&video),
            Err(err) => display::print_error(&err),
        }
    }

    async fn status(&self) {
        let state = self.workflow.snapshot().await;
        let session = self.sessions.current().await.ok().flatten();
        let playhead = self.player.position().await;
        display::status(&state, &self.backend_url, session.as_ref(), playhead);
    }

    async fn tags(&self) {
        match self.workflow.generate_tags().await {
            Ok(tags) => {
                display::print_notification(TAGS_NOTIFICATION);
                display::tags(&tags);
            }
            Err(err) => display::print_error(&err),
        }
    }

    async fn emotions(&self) {
        match self.workflow.analyze_emotions().await {
            Ok(analysis) => {
                display::print_notification(EMOTIONS_NOTIFICATION);
                display::emotions(&analysis);
            }
            Err(err) => display::print_error(&err),
        }
    }

    async fn story(&self, rest: &str) {
        match self.workflow.generate_story(rest).await {
            Ok(story) => display::story(&story),
            Err(err) => display::print_error(&err),
        }
    }

    async fn mode(&self, rest: &str) {
        match rest.parse::<StoryMode>() {
            Ok(mode) => {
                self.workflow.set_story_mode(mode).await;
                println!("{}", format!("Story mode set to {mode}.").bright_black());
            }
            Err(err) => display::print_error(&err),
        }
    }

    async fn duration(&self, rest: &str) {
        let Ok(value) = rest.parse::<f64>() else {
            usage("/duration <seconds>");
            return;
        };
        self.workflow.set_transition_duration(value).await;
        let applied = self.workflow.snapshot().await.transition_duration;
        println!(
            "{}",
            format!("Transition duration set to {applied}s.").bright_black()
        );
    }

    async fn render(&self) {
        match self.workflow.render_video().await {
            Ok(outcome) => display::renders(&outcome),
            Err(err) => display::print_error(&err),
        }
    }

    async fn inspire(&self, rest: &str) {
        match self.workflow.generate_inspiration(rest).await {
            Ok(text) => display::inspiration(&text),
            Err(err) => display::print_error(&err),
        }
    }

    async fn inspire_mode(&self, rest: &str) {
        match rest.parse::<InspirationMode>() {
            Ok(mode) => {
                self.workflow.set_inspiration_mode(mode).await;
                println!(
                    "{}",
                    format!("Inspiration mode set to {mode}.").bright_black()
                );
            }
            Err(err) => display::print_error(&err),
        }
    }

    async fn journey(&self) {
        match self.workflow.generate_journey().await {
            Ok(document) => display::journey(&document),
            Err(err) => display::print_error(&err),
        }
    }
}

fn usage(text: &str) {
    println!("{}", format!("Usage: {text}").yellow());
}

/// Splits an input line into the command word and the argument remainder.
fn split_command(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    }
}

/// Turns a 1-based argument into a 0-based index, rejecting junk and zero.
fn parse_index(rest: &str) -> Option<usize> {
    match rest.parse::<usize>() {
        Ok(n) if n >= 1 => Some(n - 1),
        _ => None,
    }
}
