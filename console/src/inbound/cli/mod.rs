//! Command-line surface of the console.
//!
//! Each subcommand drives one domain use case through a [`ConsoleContext`]
//! and writes plain-text lines to the supplied writer. Listings are paged
//! with the `pagination` crate using the global `--page`/`--page-size` flags.

mod render;

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use pagination::{Paginated, PageSize};
use thiserror::Error as ThisError;
use tracing::{debug, info};
use uuid::Uuid;

use crate::context::ConsoleContext;
use crate::domain::{
    ConsoleRoute, ContactDetails, Error, Gender, GalleryUpload, JobApplicationDraft,
    LoginCredentials, MediaKind, PersonalDetails, RegistrationError,
};

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(
    name = "edtech-console",
    about = "Browse and manage the EdTech Solutions training centre",
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub paging: PagingArgs,
    #[command(subcommand)]
    pub command: Command,
}

/// Paging flags shared by every listing.
#[derive(Debug, Clone, Copy, Args)]
pub struct PagingArgs {
    /// One-based page to show; out-of-range pages fall back to the first.
    #[arg(long, global = true, default_value_t = 1)]
    pub page: usize,
    /// Items per page.
    #[arg(long = "page-size", global = true, default_value_t = PageSize::default())]
    pub page_size: PageSize,
}

/// Optional staff credentials.
#[derive(Debug, Clone, Default, Args)]
pub struct SignInArgs {
    #[arg(long, env = "EDTECH_EMAIL")]
    pub email: Option<String>,
    #[arg(long, env = "EDTECH_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

impl SignInArgs {
    fn credentials(&self) -> Result<Option<LoginCredentials>, Error> {
        match (&self.email, &self.password) {
            (Some(email), Some(password)) => LoginCredentials::try_from_parts(email, password)
                .map(Some)
                .map_err(|err| Error::invalid_request(err.to_string())),
            (None, None) => Ok(None),
            _ => Err(Error::invalid_request(
                "--email and --password must be given together",
            )),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List active training programs.
    Programs,
    /// Show public notices.
    Notices {
        /// Keep polling and print this many refreshes.
        #[arg(long, value_name = "REFRESHES")]
        watch: Option<u64>,
    },
    /// List open vacancies.
    Vacancies,
    /// List public gallery items.
    Gallery {
        #[arg(long)]
        kind: Option<MediaKind>,
    },
    /// Show dashboard statistics (staff sign-in required).
    Stats {
        #[command(flatten)]
        sign_in: SignInArgs,
    },
    /// Evaluate the route gate for a path.
    Route {
        path: String,
        #[command(flatten)]
        sign_in: SignInArgs,
    },
    /// Apply for a vacancy.
    Apply {
        vacancy: Uuid,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        resume: String,
        #[arg(long = "cover-letter")]
        cover_letter: Option<String>,
    },
    /// Register a student for a program.
    Register(RegisterArgs),
    /// Upload a photo or video to the public gallery.
    Publish(PublishArgs),
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long = "date-of-birth", value_name = "YYYY-MM-DD")]
    pub date_of_birth: NaiveDate,
    #[arg(long)]
    pub gender: Gender,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub address: String,
    #[arg(long, default_value = "")]
    pub guardian: String,
    #[arg(long)]
    pub program: Uuid,
    #[arg(long = "education-level")]
    pub education_level: String,
}

#[derive(Debug, Args)]
pub struct PublishArgs {
    pub file: PathBuf,
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long = "content-type")]
    pub content_type: String,
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    /// Keep the item off the public gallery.
    #[arg(long)]
    pub private: bool,
    #[command(flatten)]
    pub sign_in: SignInArgs,
}

/// Notice feed settings taken from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedSettings {
    pub limit: usize,
    pub period: Duration,
}

/// Failures surfaced by [`run`].
#[derive(Debug, ThisError)]
pub enum CliError {
    #[error(transparent)]
    Domain(#[from] Error),
    #[error("i/o failed: {0}")]
    Io(#[from] io::Error),
}

/// Execute `cli` against `context`, writing results to `out`.
pub async fn run<W: Write>(
    cli: Cli,
    context: &ConsoleContext,
    feed: FeedSettings,
    out: &mut W,
) -> Result<(), CliError> {
    let paging = cli.paging;
    match cli.command {
        Command::Programs => {
            let programs = context
                .catalogue()
                .active_programs()
                .await
                .map_err(Error::from)?;
            write_page(out, &programs, paging, render::program_line)?;
        }
        Command::Notices { watch: None } => {
            let notices = context
                .catalogue()
                .public_notices(feed.limit)
                .await
                .map_err(Error::from)?;
            let today = context.today();
            write_page(out, &notices, paging, |notice| {
                render::notice_line(notice, today)
            })?;
        }
        Command::Notices {
            watch: Some(refreshes),
        } => watch_notices(context, feed, refreshes, out).await?,
        Command::Vacancies => {
            let vacancies = context
                .catalogue()
                .active_vacancies()
                .await
                .map_err(Error::from)?;
            let today = context.today();
            write_page(out, &vacancies, paging, |vacancy| {
                render::vacancy_line(vacancy, today)
            })?;
        }
        Command::Gallery { kind } => {
            let items = context
                .catalogue()
                .public_gallery(kind)
                .await
                .map_err(Error::from)?;
            write_page(out, &items, paging, render::gallery_line)?;
        }
        Command::Stats { sign_in } => {
            let credentials = sign_in.credentials()?.ok_or_else(|| {
                Error::unauthorized("dashboard statistics require --email and --password")
            })?;
            context.session().sign_in(&credentials).await?;
            let stats = context.dashboard().load().await;
            context.session().sign_out().await;
            for line in render::stats_lines(&stats?) {
                writeln!(out, "{line}")?;
            }
        }
        Command::Route { path, sign_in } => {
            let signed_in = match sign_in.credentials()? {
                Some(credentials) => {
                    context.session().sign_in(&credentials).await?;
                    true
                }
                None => false,
            };
            let status = context.session().settled().await;
            let decision = context.gate(ConsoleRoute::resolve(&path));
            writeln!(out, "{}", render::session_line(&status))?;
            writeln!(out, "{}", render::gate_line(&path, decision))?;
            if signed_in {
                context.session().sign_out().await;
            }
        }
        Command::Apply {
            vacancy,
            name,
            email,
            phone,
            resume,
            cover_letter,
        } => {
            let draft = JobApplicationDraft {
                full_name: name,
                email,
                phone,
                resume,
                cover_letter,
            };
            let application = context.careers().apply(vacancy, draft).await?;
            writeln!(
                out,
                "application from {} submitted for vacancy {}",
                application.full_name, application.vacancy_id
            )?;
        }
        Command::Register(args) => register(context, args, out).await?,
        Command::Publish(args) => publish(context, args, out).await?,
    }
    Ok(())
}

fn write_page<T, W: Write>(
    out: &mut W,
    items: &[T],
    paging: PagingArgs,
    line: impl Fn(&T) -> String,
) -> io::Result<()> {
    let mut page = Paginated::with_page_size(items, paging.page_size);
    page.go_to_page(paging.page);
    for item in page.current_items() {
        writeln!(out, "{}", line(item))?;
    }
    writeln!(out, "{}", render::page_footer(&page.page_info()))
}

async fn watch_notices<W: Write>(
    context: &ConsoleContext,
    feed: FeedSettings,
    refreshes: u64,
    out: &mut W,
) -> Result<(), CliError> {
    let notices = context.notice_feed(feed.limit, feed.period);
    let mut updates = notices.subscribe();
    let today = context.today();
    let mut seen = 0;
    while seen < refreshes {
        if updates.changed().await.is_err() {
            break;
        }
        let state = updates.borrow_and_update().clone();
        seen = state.refreshes;
        debug!(refresh = seen, notices = state.notices.len(), "notice feed refreshed");
        writeln!(out, "refresh {seen}")?;
        if let Some(error) = &state.last_error {
            writeln!(out, "refresh failed: {error}")?;
        }
        for notice in &state.notices {
            writeln!(out, "{}", render::notice_line(notice, today))?;
        }
    }
    notices.stop();
    Ok(())
}

async fn register<W: Write>(
    context: &ConsoleContext,
    args: RegisterArgs,
    out: &mut W,
) -> Result<(), CliError> {
    let program = context
        .catalogue()
        .active_programs()
        .await
        .map_err(Error::from)?
        .into_iter()
        .find(|program| program.id == args.program)
        .ok_or_else(|| Error::not_found(format!("program {} is not open", args.program)))?;

    let mut wizard = context.registration();
    wizard.set_personal(PersonalDetails {
        full_name: args.name,
        date_of_birth: Some(args.date_of_birth),
        gender: Some(args.gender),
    });
    wizard.advance().map_err(registration_error)?;
    wizard.set_contact(ContactDetails {
        email: args.email,
        phone: args.phone,
        address: args.address,
        guardian_name: args.guardian,
    });
    wizard.advance().map_err(registration_error)?;
    wizard
        .select_program(&program, &args.education_level)
        .map_err(registration_error)?;
    wizard.advance().map_err(registration_error)?;

    let student_id = wizard.submit(context.registrations().as_ref()).await?;
    writeln!(out, "registered student {student_id} for {}", program.name)?;
    Ok(())
}

async fn publish<W: Write>(
    context: &ConsoleContext,
    args: PublishArgs,
    out: &mut W,
) -> Result<(), CliError> {
    let credentials = args.sign_in.credentials()?.ok_or_else(|| {
        Error::unauthorized("publishing to the gallery requires --email and --password")
    })?;
    let file_name = args
        .file
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| Error::invalid_request("file name must be valid UTF-8"))?
        .to_owned();
    let bytes = tokio::fs::read(&args.file).await?;

    context.session().sign_in(&credentials).await?;
    let published = context
        .gallery()
        .publish(GalleryUpload {
            title: args.title,
            description: args.description,
            file_name,
            content_type: args.content_type,
            bytes,
            tags: args.tags,
            is_public: !args.private,
        })
        .await;
    context.session().sign_out().await;

    let item = published?;
    info!(item_id = %item.id, "gallery item published");
    writeln!(out, "{}", render::gallery_line(&item))?;
    Ok(())
}


fn registration_error(error: RegistrationError) -> Error {
    Error::invalid_request(error.to_string())
}

#[cfg(test)]
mod tests;
