mod handle_dns_query;
mod lookup;

pub use handle_dns_query::{DnsReply, HandleDnsQueryUseCase, ReplyTransport};
pub use lookup::{LookupReply, LookupUseCase};
