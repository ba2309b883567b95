pub mod io;
pub mod tramite;

pub use io::{ChatInput, ChatReply, MessageInput, MessageReply, Resolution, TramiteInput, TramiteReceipt};
pub use tramite::{NewTramite, Tramite};
