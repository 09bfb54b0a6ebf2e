mod party;

pub use party::{state_code_from_gstin, Party, PartyInput, PartyQuery};
