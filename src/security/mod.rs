pub mod command_executor;

pub use command_executor::{
    CommandError, CommandRunner, ExternalCommand, SafeCommandExecutor,
    is_allowed_command,
};
