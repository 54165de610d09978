use crate::protocol::{Command, Response, Role};
use crate::scheduler::JobAssigner;

/// Run one framed line from a connection of the given role against the
/// assigner and produce the reply. Blank lines produce no reply.
///
/// Every malformed or misrouted line answers [`Response::Err`] and leaves
/// the assigner untouched.
pub fn dispatch(assigner: &mut JobAssigner, role: Role, line: &str) -> Option<Response> {
    let command = Command::parse(line)?;

    let response = match (role, command) {
        (Role::Client, Command::Job(text)) => match assigner.submit(&text) {
            Ok(id) => Response::Id(id),
            Err(e) => {
                tracing::debug!(%role, error = %e, "Job rejected");
                Response::Err
            }
        },
        (Role::Client, Command::Status(id)) => {
            Response::Status(id.and_then(|id| assigner.status(id)))
        }
        (Role::Worker, Command::Fetch) => match assigner.fetch() {
            Some((id, text)) => Response::Job { id, text },
            None => Response::NoJob,
        },
        (Role::Worker, Command::Done(id)) => match assigner.complete(id) {
            Ok(()) => Response::Ok,
            Err(e) => {
                tracing::warn!(job_id = id, error = %e, "DONE rejected");
                Response::Err
            }
        },
        (_, Command::Invalid(reason)) => {
            tracing::debug!(%role, reason, line, "Invalid command");
            Response::Err
        }
        (role, command) => {
            tracing::debug!(%role, %command, "Command not allowed for role");
            Response::Err
        }
    };
    Some(response)
}
