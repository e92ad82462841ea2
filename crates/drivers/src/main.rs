mod config;
mod logging;
mod shell;

use std::io;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use config::AppConfig;
use my_space_adapters::{
    present_gallery_header, present_image_row, present_notification, present_upload_state,
    present_user, CloudinaryImageHost, MemorySessionStore, SqliteSessionStore, SystemClock,
    WalkdirUploadSource,
};
use my_space_application::{
    ApplicationError, ApplicationService, CurrentSessionQuery, DeleteImageCommand,
    EndSessionCommand, GalleryView, LoginCommand, LogoutCommand, PrepareUploadCommand,
    RefreshGalleryCommand, SessionStore, UploadImageCommand,
};
use my_space_domain::{ImageId, Session};
use shell::{progress_tracker, Shell};

#[derive(Debug, Parser)]
#[command(name = "my-space", version, about = "Personal image gallery backed by a hosted media library")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Sign in and remember the user in the session file.
    Login { email: String, password: String },
    /// Sign out. `--end-session` also forgets pending uploads.
    Logout {
        #[arg(long)]
        end_session: bool,
    },
    Whoami,
    /// Upload an image file or every image in a folder.
    Upload { path: String },
    List,
    Delete { image_id: String },
    /// Interactive session kept in memory (the default).
    Shell,
}

#[derive(Debug, Clone)]
enum CommandError {
    Usage(String),
    Runtime(String),
}

fn main() -> ExitCode {
    logging::init_logging();
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) if !error.use_stderr() => {
            let _ = error.print();
            return ExitCode::SUCCESS;
        }
        Err(error) => {
            let _ = error.print();
            return ExitCode::from(2);
        }
    };
    let config = AppConfig::load();

    match run_command(cli.command.unwrap_or(Command::Shell), &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CommandError::Usage(msg)) => {
            eprintln!("{msg}");
            ExitCode::from(2)
        }
        Err(CommandError::Runtime(msg)) => {
            eprintln!("{msg}");
            ExitCode::from(1)
        }
    }
}

fn build_application_service(
    config: &AppConfig,
    store: Box<dyn SessionStore>,
) -> Result<ApplicationService, CommandError> {
    let host = CloudinaryImageHost::new(config.host.clone(), Box::new(SystemClock))
        .map_err(|error| CommandError::Runtime(format!("failed to build http client: {error}")))?;
    Ok(ApplicationService::new(
        Box::new(host),
        store,
        Box::new(WalkdirUploadSource),
        config.credentials.clone(),
    ))
}

fn session_file_store(config: &AppConfig) -> Result<Box<dyn SessionStore>, CommandError> {
    let store = SqliteSessionStore::new(config.session_path.clone());
    store
        .initialize()
        .map_err(|error| CommandError::Runtime(format!("failed to open session: {error}")))?;
    Ok(Box::new(store))
}

fn run_command(command: Command, config: &AppConfig) -> Result<(), CommandError> {
    if let Command::Shell = command {
        let service = build_application_service(config, Box::new(MemorySessionStore::new()))?;
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        return Shell::new(&service, None)
            .run(stdin.lock(), &mut stdout)
            .map_err(|error| CommandError::Runtime(format!("shell failed: {error}")));
    }

    let service = build_application_service(config, session_file_store(config)?)?;
    match command {
        Command::Login { email, password } => {
            let session = service
                .login(LoginCommand { email, password })
                .map_err(|error| match error {
                    ApplicationError::InvalidCredentials(message) => CommandError::Usage(message),
                    other => CommandError::Runtime(format!("login failed: {other}")),
                })?;
            println!("signed in as {}", present_user(&session.user));
            Ok(())
        }
        Command::Logout { end_session } => {
            let result = if end_session {
                service.end_session(EndSessionCommand)
            } else {
                service.logout(LogoutCommand)
            };
            result.map_err(|error| CommandError::Runtime(format!("logout failed: {error}")))?;
            println!("signed out");
            Ok(())
        }
        Command::Whoami => {
            let session = require_session(&service)?;
            println!("{}", present_user(&session.user));
            let pending = service.pending_uploads(&session);
            if !pending.is_empty() {
                println!("{} upload(s) waiting for the host listing", pending.len());
            }
            Ok(())
        }
        Command::Upload { path } => {
            let session = require_session(&service)?;
            let files = service
                .prepare_upload(PrepareUploadCommand { path })
                .map_err(|error| CommandError::Usage(error.to_string()))?;

            let mut failed = 0;
            for file in files {
                let name = file.file_name.clone();
                let tracker = progress_tracker();
                if let Err(error) =
                    service.upload_image(&session, UploadImageCommand { file }, &tracker)
                {
                    eprintln!("{name}: {error}");
                    failed += 1;
                }
                println!("{name}: {}", present_upload_state(&tracker.state()));
            }
            if failed > 0 {
                return Err(CommandError::Runtime(format!("{failed} upload(s) failed")));
            }
            Ok(())
        }
        Command::List => {
            let session = require_session(&service)?;
            let images = service.refresh_gallery(&session, RefreshGalleryCommand);
            println!("{}", present_gallery_header(images.len()));
            for image in &images {
                println!("{}", present_image_row(image));
            }
            Ok(())
        }
        Command::Delete { image_id } => {
            let image_id = ImageId::new(image_id)
                .map_err(|error| CommandError::Usage(format!("invalid image id: {error}")))?;
            let session = require_session(&service)?;
            let mut view = GalleryView::new(service.refresh_gallery(&session, RefreshGalleryCommand));
            let result = service.delete_image(&session, &mut view, DeleteImageCommand { image_id });
            if let Some(notification) = view.take_notification() {
                println!("{}", present_notification(&notification));
            }
            result.map_err(|error| CommandError::Runtime(format!("delete failed: {error}")))
        }
        Command::Shell => Ok(()),
    }
}

fn require_session(service: &ApplicationService) -> Result<Session, CommandError> {
    service
        .current_session(CurrentSessionQuery)
        .map_err(|error| CommandError::Runtime(format!("failed to read session: {error}")))?
        .ok_or_else(|| CommandError::Runtime("not signed in (run `my-space login`)".to_string()))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use my_space_adapters::HostConfig;
    use my_space_domain::Credentials;

    use super::*;

    fn config(session_path: String) -> AppConfig {
        AppConfig {
            host: HostConfig {
                cloud_name: "demo".to_string(),
                upload_preset: "preset".to_string(),
                api_key: "key".to_string(),
                api_secret: "secret".to_string(),
                gallery_tag: "gallery".to_string(),
                api_base_url: "http://127.0.0.1:9".to_string(),
                resource_base_url: "http://127.0.0.1:9".to_string(),
                timeout: Duration::from_secs(1),
            },
            credentials: Credentials::new("me@example.com", "secret"),
            session_path,
        }
    }

    #[test]
    fn no_subcommand_defaults_to_shell() {
        let cli = Cli::try_parse_from(["my-space"]).expect("parse");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parse_logout_end_session_flag() {
        let cli = Cli::try_parse_from(["my-space", "logout", "--end-session"]).expect("parse");
        assert!(matches!(
            cli.command,
            Some(Command::Logout { end_session: true })
        ));
    }

    #[test]
    fn parse_delete_requires_image_id() {
        assert!(Cli::try_parse_from(["my-space", "delete"]).is_err());
    }

    #[test]
    fn login_persists_across_commands_until_logout() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.sqlite3");
        let config = config(path.to_string_lossy().into_owned());

        let rejected = run_command(
            Command::Login {
                email: "me@example.com".to_string(),
                password: "nope".to_string(),
            },
            &config,
        );
        assert!(matches!(rejected, Err(CommandError::Usage(_))));
        assert!(matches!(
            run_command(Command::Whoami, &config),
            Err(CommandError::Runtime(_))
        ));

        run_command(
            Command::Login {
                email: "me@example.com".to_string(),
                password: "secret".to_string(),
            },
            &config,
        )
        .expect("login");
        run_command(Command::Whoami, &config).expect("whoami after login");

        run_command(Command::Logout { end_session: false }, &config).expect("logout");
        assert!(matches!(
            run_command(Command::Whoami, &config),
            Err(CommandError::Runtime(_))
        ));
    }
}
