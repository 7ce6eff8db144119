// Use cases: application workflows built on domain ports.

pub mod lookup_ticket;

#[cfg(test)]
pub(crate) mod test_support;

pub use lookup_ticket::LookupTicketUseCase;
