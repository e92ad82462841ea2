use std::io::{self, BufRead, Lines, Write};

use my_space_adapters::{
    present_gallery_header, present_image_detail, present_image_row, present_notification,
    present_upload_state, present_user,
};
use my_space_application::{
    ApplicationError, ApplicationService, DeleteImageCommand, GalleryView, LoginCommand,
    LogoutCommand, PrepareUploadCommand, RefreshGalleryCommand, UploadImageCommand,
    UploadTracker,
};
use my_space_domain::{
    post_login_target, resolve, ImageId, Navigation, Route, Session, UploadState,
};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Go(String),
    Login { email: String, password: String },
    Logout,
    Upload(String),
    Refresh,
    Open(String),
    Next,
    Previous,
    Close,
    Link,
    Delete,
    Help,
    Quit,
}

pub fn parse_shell_command(line: &str) -> Result<Option<ShellCommand>, String> {
    let mut parts = line.split_whitespace();
    let Some(name) = parts.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = parts.collect();

    let command = match (name, args.as_slice()) {
        ("go", [path]) => ShellCommand::Go(path.to_string()),
        ("login", [email, password]) => ShellCommand::Login {
            email: email.to_string(),
            password: password.to_string(),
        },
        ("logout", []) => ShellCommand::Logout,
        ("upload", [path]) => ShellCommand::Upload(path.to_string()),
        ("refresh", []) => ShellCommand::Refresh,
        ("open", [id]) => ShellCommand::Open(id.to_string()),
        ("next", []) => ShellCommand::Next,
        ("prev", []) => ShellCommand::Previous,
        ("close", []) => ShellCommand::Close,
        ("link", []) => ShellCommand::Link,
        ("delete", []) => ShellCommand::Delete,
        ("help", []) => ShellCommand::Help,
        ("quit" | "exit", []) => ShellCommand::Quit,
        ("go" | "upload" | "open", _) => return Err(format!("usage: {name} <argument>")),
        ("login", _) => return Err("usage: login <email> <password>".to_string()),
        _ => return Err(format!("unknown command: {name} (try `help`)")),
    };
    Ok(Some(command))
}

pub struct Shell<'a> {
    service: &'a ApplicationService,
    session: Option<Session>,
    route: Route,
    return_to: Option<String>,
    view: GalleryView,
}

impl<'a> Shell<'a> {
    pub fn new(service: &'a ApplicationService, session: Option<Session>) -> Self {
        Self {
            service,
            session,
            route: Route::Login,
            return_to: None,
            view: GalleryView::default(),
        }
    }

    pub fn run<R: BufRead, W: Write>(&mut self, input: R, output: &mut W) -> io::Result<()> {
        self.navigate("/", output)?;
        let mut lines = input.lines();
        loop {
            write!(output, "my-space:{}> ", self.route.path())?;
            output.flush()?;
            let Some(line) = lines.next() else {
                writeln!(output)?;
                return Ok(());
            };
            match parse_shell_command(&line?) {
                Ok(None) => {}
                Ok(Some(ShellCommand::Quit)) => return Ok(()),
                Ok(Some(command)) => self.execute(command, &mut lines, output)?,
                Err(message) => writeln!(output, "{message}")?,
            }
        }
    }

    fn execute<R: BufRead, W: Write>(
        &mut self,
        command: ShellCommand,
        lines: &mut Lines<R>,
        output: &mut W,
    ) -> io::Result<()> {
        match command {
            ShellCommand::Go(path) => self.navigate(&path, output),
            ShellCommand::Login { email, password } => self.login(email, password, output),
            ShellCommand::Logout => {
                if let Err(error) = self.service.logout(LogoutCommand) {
                    warn!("logout failed: {error}");
                }
                self.session = None;
                self.view = GalleryView::default();
                self.navigate(Route::Login.path(), output)
            }
            ShellCommand::Upload(path) => self.upload(&path, output),
            ShellCommand::Refresh => {
                if self.on_dashboard(output)? {
                    self.render(output)?;
                }
                Ok(())
            }
            ShellCommand::Open(raw_id) => {
                if !self.on_dashboard(output)? {
                    return Ok(());
                }
                let image_id = match ImageId::new(raw_id.as_str()) {
                    Ok(image_id) => image_id,
                    Err(error) => return writeln!(output, "{error}"),
                };
                if self.view.select(&image_id).is_none() {
                    return writeln!(output, "no image {image_id} in the gallery");
                }
                self.show_selected(output)
            }
            ShellCommand::Next | ShellCommand::Previous => {
                if !self.on_dashboard(output)? {
                    return Ok(());
                }
                let moved = if command == ShellCommand::Next {
                    self.view.select_next().is_some()
                } else {
                    self.view.select_previous().is_some()
                };
                if !moved {
                    return writeln!(output, "open an image first");
                }
                self.show_selected(output)
            }
            ShellCommand::Close => {
                self.view.close();
                Ok(())
            }
            ShellCommand::Link => match self.view.selected() {
                Some(image) => writeln!(output, "{}", image.url),
                None => writeln!(output, "open an image first"),
            },
            ShellCommand::Delete => self.delete(lines, output),
            ShellCommand::Help => print_help(output),
            ShellCommand::Quit => Ok(()),
        }
    }

    fn navigate<W: Write>(&mut self, path: &str, output: &mut W) -> io::Result<()> {
        match resolve(path, self.session.as_ref()) {
            Navigation::Render(route) => {
                self.route = route;
                self.render(output)
            }
            Navigation::Redirect { to, from } => {
                if from.is_some() {
                    self.return_to = from;
                }
                self.navigate(to.path(), output)
            }
            Navigation::NotFound(path) => writeln!(output, "no page at {path}"),
        }
    }

    fn render<W: Write>(&mut self, output: &mut W) -> io::Result<()> {
        match self.route {
            Route::Login => {
                writeln!(output, "My Space: sign in to manage your images")?;
                writeln!(output, "  login <email> <password>")
            }
            Route::Upload => {
                writeln!(output, "Upload Image: add new memories to your gallery")?;
                writeln!(output, "  upload <file-or-folder>")
            }
            Route::Dashboard => {
                let Some(session) = &self.session else {
                    return Ok(());
                };
                let images = self
                    .service
                    .refresh_gallery(session, RefreshGalleryCommand);
                self.view.replace_images(images);
                writeln!(output, "My Gallery ({})", present_user(&session.user))?;
                writeln!(output, "{}", present_gallery_header(self.view.len()))?;
                for image in self.view.images() {
                    writeln!(output, "  {}", present_image_row(image))?;
                }
                Ok(())
            }
        }
    }

    fn login<W: Write>(&mut self, email: String, password: String, output: &mut W) -> io::Result<()> {
        match self.service.login(LoginCommand { email, password }) {
            Ok(session) => {
                writeln!(output, "Signed in as {}", present_user(&session.user))?;
                self.session = Some(session);
                let target = post_login_target(self.return_to.as_deref()).to_string();
                self.return_to = None;
                self.navigate(&target, output)
            }
            Err(ApplicationError::InvalidCredentials(message)) => writeln!(output, "{message}"),
            Err(error) => writeln!(output, "Failed to login: {error}"),
        }
    }

    fn upload<W: Write>(&mut self, path: &str, output: &mut W) -> io::Result<()> {
        if self.route != Route::Upload {
            self.navigate(Route::Upload.path(), output)?;
        }
        let Some(session) = self.session.clone() else {
            return Ok(());
        };

        let files = match self.service.prepare_upload(PrepareUploadCommand {
            path: path.to_string(),
        }) {
            Ok(files) => files,
            Err(error) => return writeln!(output, "{error}"),
        };

        let mut failed = 0;
        for file in files {
            let name = file.file_name.clone();
            let tracker = progress_tracker();
            let result =
                self.service
                    .upload_image(&session, UploadImageCommand { file }, &tracker);
            writeln!(output, "{name}: {}", present_upload_state(&tracker.state()))?;
            if let Err(error) = result {
                failed += 1;
                warn!(file = %name, "{error}");
            }
        }

        if failed == 0 {
            self.navigate(Route::Dashboard.path(), output)?;
        }
        Ok(())
    }

    fn delete<R: BufRead, W: Write>(
        &mut self,
        lines: &mut Lines<R>,
        output: &mut W,
    ) -> io::Result<()> {
        let Some(session) = self.session.clone() else {
            return writeln!(output, "sign in first");
        };
        let Some(image) = self.view.selected().cloned() else {
            return writeln!(output, "open an image first");
        };

        write!(
            output,
            "Delete \"{}\"? This action cannot be undone. [y/N] ",
            image.name
        )?;
        output.flush()?;
        let answer = lines.next().transpose()?.unwrap_or_default();
        if !matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
            return writeln!(output, "kept {}", image.name);
        }

        let result = self.service.delete_image(
            &session,
            &mut self.view,
            DeleteImageCommand {
                image_id: image.id.clone(),
            },
        );
        if let Err(error) = result {
            warn!(image = %image.id, "{error}");
        }
        if let Some(notification) = self.view.take_notification() {
            writeln!(output, "{}", present_notification(&notification))?;
        }
        writeln!(output, "{}", present_gallery_header(self.view.len()))
    }

    fn show_selected<W: Write>(&self, output: &mut W) -> io::Result<()> {
        let Some(image) = self.view.selected() else {
            return Ok(());
        };
        let position = self
            .view
            .images()
            .iter()
            .position(|candidate| candidate.id == image.id)
            .unwrap_or_default();
        writeln!(
            output,
            "{}",
            present_image_detail(image, position, self.view.len())
        )
    }

    fn on_dashboard<W: Write>(&self, output: &mut W) -> io::Result<bool> {
        if self.route == Route::Dashboard {
            return Ok(true);
        }
        writeln!(output, "open the gallery first (go /dashboard)")?;
        Ok(false)
    }
}

pub fn progress_tracker() -> UploadTracker {
    UploadTracker::with_listener(|state| {
        if state.is_finished() {
            eprintln!();
        } else if let UploadState::Uploading(_) = state {
            eprint!("\r{}", present_upload_state(state));
        }
    })
}

fn print_help<W: Write>(output: &mut W) -> io::Result<()> {
    writeln!(output, "commands:")?;
    writeln!(output, "  go <path>                 /login, /dashboard, /upload")?;
    writeln!(output, "  login <email> <password>")?;
    writeln!(output, "  logout")?;
    writeln!(output, "  upload <file-or-folder>")?;
    writeln!(output, "  refresh")?;
    writeln!(output, "  open <id> | next | prev | close")?;
    writeln!(output, "  link                      print the open image's URL")?;
    writeln!(output, "  delete                    delete the open image")?;
    writeln!(output, "  quit")
}
