// Interface adapters: authority wire protocol, HTTP client and navigation.

pub mod clients;
pub mod navigation;
pub mod protocol;
