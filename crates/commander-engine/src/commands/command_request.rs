//! Request-level commands for the Command resource.

#![allow(clippy::result_large_err)]

use commander_core::{CommandId, CommandRead, CommandRepo, RecordStore, Result, ValidationErrors};

use crate::commands::handlers;

/// One request against the Command collection
///
/// Bodies stay as raw bytes so that an update can answer "not found"
/// before the body is looked at.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandRequest {
    /// `GET /api/v1/commands`
    List,
    /// `GET /api/v1/commands/{id}`
    Get { id: CommandId },
    /// `POST /api/v1/commands`
    Create { body: Vec<u8> },
    /// `PUT /api/v1/commands/{id}`
    Update { id: CommandId, body: Vec<u8> },
    /// `DELETE /api/v1/commands/{id}`
    Delete { id: CommandId },
}

/// What happened to a request, independent of any wire protocol
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome {
    /// Every committed record
    Listed(Vec<CommandRead>),
    /// The requested record
    Found(CommandRead),
    /// A new record, with its assigned id
    Created(CommandRead),
    /// The change was committed; nothing to return
    NoContent,
    /// No record has the requested id
    NotFound,
    /// The body was malformed or failed validation
    Invalid(ValidationErrors),
}

/// Apply a request in a fresh unit of work over `store`
///
/// Every request gets its own `CommandRepo`, so staged changes never leak
/// between requests.
///
/// # Errors
/// `Storage` when the store fails; `InvalidArgument` for contract
/// violations between layers.
pub fn apply_request(request: CommandRequest, store: &dyn RecordStore) -> Result<RequestOutcome> {
    let mut repo = CommandRepo::new(store);

    match request {
        CommandRequest::List => handlers::list_commands(&repo).map(RequestOutcome::Listed),
        CommandRequest::Get { id } => Ok(match handlers::get_command(&mut repo, id)? {
            Some(read) => RequestOutcome::Found(read),
            None => RequestOutcome::NotFound,
        }),
        CommandRequest::Create { body } => handlers::create_command(&mut repo, &body),
        CommandRequest::Update { id, body } => handlers::update_command(&mut repo, id, &body),
        CommandRequest::Delete { id } => handlers::delete_command(&mut repo, id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commander_core::MemoryStore;

    #[test]
    fn test_each_request_uses_its_own_unit_of_work() {
        let store = MemoryStore::new();

        let created = apply_request(
            CommandRequest::Create {
                body: br#"{"howTo":"list files","platform":"unix","commandLine":"ls"}"#.to_vec(),
            },
            &store,
        )
        .unwrap();
        let id = match created {
            RequestOutcome::Created(read) => read.id,
            other => panic!("Expected Created, got {:?}", other),
        };

        match apply_request(CommandRequest::Get { id }, &store).unwrap() {
            RequestOutcome::Found(read) => assert_eq!(read.how_to, "list files"),
            other => panic!("Expected Found, got {:?}", other),
        }
    }

    #[test]
    fn test_list_on_empty_store() {
        let store = MemoryStore::new();

        assert_eq!(
            apply_request(CommandRequest::List, &store).unwrap(),
            RequestOutcome::Listed(Vec::new())
        );
    }
}
