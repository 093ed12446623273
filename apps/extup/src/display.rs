//! Final result rendering

use crate::error::CliError;
use extup_ops::OperationResult;

/// Render the final operation result
pub fn render(result: &OperationResult, json: bool) -> Result<(), CliError> {
    if json {
        println!("{}", result.to_json()?);
        return Ok(());
    }

    match result {
        // Progress lines were already rendered by the event stream
        OperationResult::Bootstrap(_) => {}
        OperationResult::Plan(plan) => {
            println!("Recorded {} -> current {}", plan.previous, plan.current);
            if plan.removals.is_empty() && plan.installs.is_empty() && plan.processes.is_empty() {
                println!("Nothing to update.");
            } else {
                for package in &plan.removals {
                    println!("  would remove {package}");
                }
                for package in &plan.installs {
                    println!("  would install {package}");
                }
                for since in &plan.processes {
                    println!("  would run migration for {since}");
                }
            }
            for package in &plan.skipped_installs {
                println!("  {package} already installed");
            }
            for package in &plan.skipped_removals {
                println!("  {package} not installed");
            }
        }
        OperationResult::Status(status) => {
            println!("Recorded version: {}", status.previous);
            println!("Current version:  {}", status.current);
            if status.fresh_install {
                println!("No bootstrap run has completed yet.");
            }
            if status.pending {
                println!("Pending work: yes (see `extup plan`)");
            } else {
                println!("Pending work: no");
            }
        }
        OperationResult::Success(message) => println!("{message}"),
    }
    Ok(())
}
