//! Command tokenizing and dispatch tables.

pub mod abor;
pub mod allo;
pub mod cdup;
pub mod cwd;
pub mod dele;
pub mod feat;
pub mod list;
pub mod mdtm;
pub mod mkd;
pub mod noop;
pub mod pass;
pub mod pwd;
pub mod quit;
pub mod rest;
pub mod retr;
pub mod rmd;
pub mod rnfr;
pub mod rnto;
pub mod size;
pub mod stat;
pub mod stor;
pub mod syst;
pub mod type_;
pub mod user;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FtpCommand {
    USER,
    PASS,
    QUIT,
    NOOP,
    SYST,
    FEAT,
    AUTH,
    TYPE,
    PWD,
    CWD,
    CDUP,
    MKD,
    RMD,
    DELE,
    RNFR,
    RNTO,
    SIZE,
    MDTM,
    STAT,
    LIST,
    NLST,
    PASV,
    EPSV,
    PORT,
    EPRT,
    RETR,
    STOR,
    STOU,
    APPE,
    REST,
    ALLO,
    ABOR,
}

impl FtpCommand {
    pub fn from_str(verb: &str) -> Option<FtpCommand> {
        match verb.to_ascii_uppercase().as_str() {
            "USER" => Some(FtpCommand::USER),
            "PASS" => Some(FtpCommand::PASS),
            "QUIT" => Some(FtpCommand::QUIT),
            "NOOP" => Some(FtpCommand::NOOP),
            "SYST" => Some(FtpCommand::SYST),
            "FEAT" => Some(FtpCommand::FEAT),
            "AUTH" => Some(FtpCommand::AUTH),
            "TYPE" => Some(FtpCommand::TYPE),
            "PWD" | "XPWD" => Some(FtpCommand::PWD),
            "CWD" => Some(FtpCommand::CWD),
            "CDUP" => Some(FtpCommand::CDUP),
            "MKD" | "XMKD" => Some(FtpCommand::MKD),
            "RMD" | "XRMD" => Some(FtpCommand::RMD),
            "DELE" => Some(FtpCommand::DELE),
            "RNFR" => Some(FtpCommand::RNFR),
            "RNTO" => Some(FtpCommand::RNTO),
            "SIZE" => Some(FtpCommand::SIZE),
            "MDTM" => Some(FtpCommand::MDTM),
            "STAT" => Some(FtpCommand::STAT),
            "LIST" => Some(FtpCommand::LIST),
            "NLST" => Some(FtpCommand::NLST),
            "PASV" => Some(FtpCommand::PASV),
            "EPSV" => Some(FtpCommand::EPSV),
            "PORT" => Some(FtpCommand::PORT),
            "EPRT" => Some(FtpCommand::EPRT),
            "RETR" => Some(FtpCommand::RETR),
            "STOR" => Some(FtpCommand::STOR),
            "STOU" => Some(FtpCommand::STOU),
            "APPE" => Some(FtpCommand::APPE),
            "REST" => Some(FtpCommand::REST),
            "ALLO" => Some(FtpCommand::ALLO),
            "ABOR" => Some(FtpCommand::ABOR),
            _ => None,
        }
    }

    /// Commands serviced before USER/PASS completes. Everything else gets
    /// 530 while unauthenticated.
    pub fn allowed_unauthenticated(&self) -> bool {
        matches!(
            self,
            FtpCommand::USER
                | FtpCommand::PASS
                | FtpCommand::QUIT
                | FtpCommand::NOOP
                | FtpCommand::FEAT
                | FtpCommand::AUTH
                | FtpCommand::SYST
        )
    }

    /// Commands that keep a restart offset set by REST alive: the data
    /// channel setup family. Any other command clears it.
    pub fn preserves_restart_offset(&self) -> bool {
        matches!(
            self,
            FtpCommand::REST
                | FtpCommand::PASV
                | FtpCommand::EPSV
                | FtpCommand::PORT
                | FtpCommand::EPRT
        )
    }
}

/// Connection-flavored errors after a transfer has started map to 426;
/// everything else is a backend failure reported as 550.
pub(crate) fn is_connection_error(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted
            | std::io::ErrorKind::BrokenPipe
            | std::io::ErrorKind::UnexpectedEof
            | std::io::ErrorKind::TimedOut
    )
}

/// Splits a control line into an upper-cased verb and the verbatim
/// argument (spaces preserved).
pub fn parse_line(line: &str) -> (String, &str) {
    let line = line.trim_end_matches(['\r', '\n']);
    match line.find(char::is_whitespace) {
        Some(i) => (line[..i].to_ascii_uppercase(), line[i..].trim_start()),
        None => (line.to_ascii_uppercase(), ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbs_are_case_insensitive() {
        assert_eq!(FtpCommand::from_str("user"), Some(FtpCommand::USER));
        assert_eq!(FtpCommand::from_str("ReTr"), Some(FtpCommand::RETR));
        assert_eq!(FtpCommand::from_str("BOGUS"), None);
    }

    #[test]
    fn legacy_aliases_map_to_modern_verbs() {
        assert_eq!(FtpCommand::from_str("XPWD"), Some(FtpCommand::PWD));
        assert_eq!(FtpCommand::from_str("XMKD"), Some(FtpCommand::MKD));
        assert_eq!(FtpCommand::from_str("XRMD"), Some(FtpCommand::RMD));
    }

    #[test]
    fn arguments_keep_their_spaces() {
        let (verb, arg) = parse_line("STOR my file name.txt\r\n");
        assert_eq!(verb, "STOR");
        assert_eq!(arg, "my file name.txt");
    }

    #[test]
    fn bare_verb_has_empty_argument() {
        let (verb, arg) = parse_line("pasv\r\n");
        assert_eq!(verb, "PASV");
        assert_eq!(arg, "");
    }

    #[test]
    fn auth_gate_admits_the_prelogin_set_only() {
        for cmd in [
            FtpCommand::USER,
            FtpCommand::PASS,
            FtpCommand::QUIT,
            FtpCommand::NOOP,
            FtpCommand::FEAT,
            FtpCommand::AUTH,
            FtpCommand::SYST,
        ] {
            assert!(cmd.allowed_unauthenticated(), "{:?}", cmd);
        }
        for cmd in [
            FtpCommand::PWD,
            FtpCommand::CWD,
            FtpCommand::RETR,
            FtpCommand::STOR,
            FtpCommand::PASV,
            FtpCommand::STAT,
        ] {
            assert!(!cmd.allowed_unauthenticated(), "{:?}", cmd);
        }
    }

    #[test]
    fn data_setup_commands_preserve_the_offset() {
        assert!(FtpCommand::PASV.preserves_restart_offset());
        assert!(FtpCommand::REST.preserves_restart_offset());
        assert!(!FtpCommand::NOOP.preserves_restart_offset());
        assert!(!FtpCommand::RETR.preserves_restart_offset());
    }
}
