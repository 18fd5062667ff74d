pub mod badges;
pub mod champions;
pub mod lobby;
pub mod profile;
pub mod social;
pub mod summoner;
pub mod watch;
