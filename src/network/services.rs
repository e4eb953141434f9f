//! Static service-name table for well-known TCP ports

use crate::error::LookupError;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Maps a port number to its conventional service name
pub trait ServiceNameResolver: Send + Sync {
    fn name_for_port(&self, port: u16) -> Result<String, LookupError>;
}

/// Names follow the IANA registry as shipped in `/etc/services`
static TCP_SERVICES: Lazy<HashMap<u16, &'static str>> = Lazy::new(|| {
    [
        (7, "echo"),
        (9, "discard"),
        (13, "daytime"),
        (19, "chargen"),
        (20, "ftp-data"),
        (21, "ftp"),
        (22, "ssh"),
        (23, "telnet"),
        (25, "smtp"),
        (37, "time"),
        (43, "whois"),
        (53, "domain"),
        (70, "gopher"),
        (79, "finger"),
        (80, "http"),
        (88, "kerberos"),
        (110, "pop3"),
        (111, "sunrpc"),
        (113, "auth"),
        (119, "nntp"),
        (123, "ntp"),
        (135, "epmap"),
        (137, "netbios-ns"),
        (138, "netbios-dgm"),
        (139, "netbios-ssn"),
        (143, "imap"),
        (161, "snmp"),
        (179, "bgp"),
        (194, "irc"),
        (389, "ldap"),
        (443, "https"),
        (445, "microsoft-ds"),
        (465, "submissions"),
        (514, "shell"),
        (515, "printer"),
        (543, "klogin"),
        (544, "kshell"),
        (587, "submission"),
        (631, "ipp"),
        (636, "ldaps"),
        (873, "rsync"),
        (989, "ftps-data"),
        (990, "ftps"),
        (993, "imaps"),
        (995, "pop3s"),
        (1080, "socks"),
        (1433, "ms-sql-s"),
        (1434, "ms-sql-m"),
        (1521, "ncube-lm"),
        (1723, "pptp"),
        (1883, "mqtt"),
        (2049, "nfs"),
        (2181, "zookeeper"),
        (3260, "iscsi-target"),
        (3306, "mysql"),
        (3389, "ms-wbt-server"),
        (4369, "epmd"),
        (5060, "sip"),
        (5222, "xmpp-client"),
        (5269, "xmpp-server"),
        (5353, "mdns"),
        (5432, "postgresql"),
        (5672, "amqp"),
        (5900, "rfb"),
        (6379, "redis"),
        (6667, "ircd"),
        (8080, "http-alt"),
        (8443, "https-alt"),
        (9418, "git"),
        (11211, "memcache"),
        (27017, "mongodb"),
    ]
    .into_iter()
    .collect()
});

/// Lookup backed by the built-in table
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceDatabase;

impl ServiceDatabase {
    pub fn new() -> Self {
        Self
    }

    pub fn get_tcp_service(&self, port: u16) -> Option<&'static str> {
        TCP_SERVICES.get(&port).copied()
    }
}

impl ServiceNameResolver for ServiceDatabase {
    fn name_for_port(&self, port: u16) -> Result<String, LookupError> {
        self.get_tcp_service(port)
            .map(str::to_string)
            .ok_or(LookupError(port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::COMMON_PORTS;

    #[test]
    fn test_well_known_names() {
        let db = ServiceDatabase::new();
        assert_eq!(db.name_for_port(22).unwrap(), "ssh");
        assert_eq!(db.name_for_port(80).unwrap(), "http");
        assert_eq!(db.name_for_port(443).unwrap(), "https");
    }

    #[test]
    fn test_unknown_port() {
        let db = ServiceDatabase::new();
        assert_eq!(db.name_for_port(31337), Err(LookupError(31337)));
    }

    #[test]
    fn test_common_ports_are_named() {
        let db = ServiceDatabase::new();
        for port in COMMON_PORTS {
            assert!(db.name_for_port(port).is_ok(), "port {} has no name", port);
        }
    }
}
