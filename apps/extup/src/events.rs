//! Terminal rendering of the event stream

use console::style;
use extup_events::{AppEvent, BootstrapEvent, GeneralEvent, MigrateEvent, PackageEvent};

/// Renders events as they arrive, concurrently with the running command
pub struct EventHandler {
    colors: bool,
    debug: bool,
}

impl EventHandler {
    pub fn new(colors: bool, debug: bool) -> Self {
        Self { colors, debug }
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Bootstrap(event) => self.handle_bootstrap(event),
            AppEvent::Package(event) => self.handle_package(event),
            AppEvent::Migrate(event) => self.handle_migrate(event),
            AppEvent::General(event) => self.handle_general(event),
        }
    }

    fn handle_bootstrap(&self, event: BootstrapEvent) {
        match event {
            BootstrapEvent::Started { previous, current } => {
                println!("Bootstrapping {previous} -> {current}");
            }
            BootstrapEvent::Planned {
                removals,
                installs,
                processes,
            } => {
                if !removals.is_empty() {
                    println!("  remove: {}", removals.join(", "));
                }
                if !installs.is_empty() {
                    println!("  install: {}", installs.join(", "));
                }
                if processes > 0 {
                    println!("  migrations: {processes}");
                }
            }
            BootstrapEvent::Completed {
                outcome,
                removed,
                installed,
                processed,
                duration,
            } => {
                let summary =
                    format!("{outcome}: {removed} removed, {installed} installed, {processed} migrated");
                if self.colors {
                    println!("{} ({:.1?})", style(summary).green(), duration);
                } else {
                    println!("{summary} ({duration:.1?})");
                }
            }
            BootstrapEvent::Failed { message } => {
                if self.colors {
                    eprintln!("{} {message}", style("bootstrap failed:").red().bold());
                } else {
                    eprintln!("bootstrap failed: {message}");
                }
            }
        }
    }

    fn handle_package(&self, event: PackageEvent) {
        match event {
            PackageEvent::InstallStarted { package } => {
                println!("  installing {package}...");
            }
            PackageEvent::Installed { package } => {
                self.ok(&format!("installed {package}"));
            }
            PackageEvent::RemoveStarted { package } => {
                println!("  removing {package}...");
            }
            PackageEvent::Removed { package, deferred } => {
                if deferred {
                    self.ok(&format!("removal of {package} deferred until restart"));
                } else {
                    self.ok(&format!("removed {package}"));
                }
            }
            PackageEvent::Disabled { package } => {
                if self.debug {
                    println!("  disabled {package}");
                }
            }
            PackageEvent::Reenabled { package } => {
                if self.debug {
                    println!("  re-enabled {package}");
                }
            }
            PackageEvent::SkippedAlreadyInstalled { package } => {
                println!("  {package} already installed, skipping");
            }
            PackageEvent::SkippedNotInstalled { package } => {
                println!("  {package} not installed, nothing to remove");
            }
        }
    }

    fn handle_migrate(&self, event: MigrateEvent) {
        match event {
            MigrateEvent::ProcessStarted { since } => {
                println!("  running migration for {since}...");
            }
            MigrateEvent::ProcessCompleted { since } => {
                self.ok(&format!("migration for {since} done"));
            }
        }
    }

    fn handle_general(&self, event: GeneralEvent) {
        match event {
            GeneralEvent::Warning { message, context } => {
                let text = match context {
                    Some(context) => format!("warning: {message} ({context})"),
                    None => format!("warning: {message}"),
                };
                if self.colors {
                    eprintln!("{}", style(text).yellow());
                } else {
                    eprintln!("{text}");
                }
            }
            GeneralEvent::Error { message, details } => {
                let text = match details {
                    Some(details) => format!("error: {message}: {details}"),
                    None => format!("error: {message}"),
                };
                if self.colors {
                    eprintln!("{}", style(text).red());
                } else {
                    eprintln!("{text}");
                }
            }
            GeneralEvent::DebugLog { message, .. } => {
                if self.debug {
                    println!("  [debug] {message}");
                }
            }
            GeneralEvent::OperationStarted { operation } => {
                if self.debug {
                    println!("  [debug] {operation} started");
                }
            }
            GeneralEvent::OperationCompleted { operation, success } => {
                if self.debug {
                    println!("  [debug] {operation} completed (success: {success})");
                }
            }
            GeneralEvent::OperationFailed { operation, error } => {
                eprintln!("{operation} failed: {error}");
            }
        }
    }

    fn ok(&self, message: &str) {
        if self.colors {
            println!("  {} {message}", style("ok").green());
        } else {
            println!("  ok {message}");
        }
    }
}
