use std::num::NonZeroU32;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use maternova_id::{AuthorityConfig, IssuancePolicy, NewBeneficiary, PatientId, Role};

/// Command line arguments for the `maternova-id` binary.
///
/// Every global option can also be set through the environment (or a `.env`
/// file in the working directory).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "maternova-id",
    version,
    about = "Issue, reconcile and inspect role-encoded patient identifiers"
)]
pub struct CliArgs {
    /// JSON-lines file holding one beneficiary record per line.
    ///
    /// A missing file is treated as an empty ledger.
    ///
    /// Environment variable: `MATERNOVA_LEDGER`
    #[arg(long, global = true, env = "MATERNOVA_LEDGER", default_value = "patients.jsonl")]
    pub ledger: PathBuf,

    /// How ASHA and unrecognised roles are issued.
    ///
    /// Environment variable: `MATERNOVA_POLICY`
    #[arg(long, global = true, env = "MATERNOVA_POLICY", value_enum, ignore_case = true, default_value_t = PolicyArg::Sequential)]
    pub policy: PolicyArg,

    /// Reservation attempts per registration before reporting a conflict.
    ///
    /// Environment variable: `MATERNOVA_MAX_ATTEMPTS`
    #[arg(long, global = true, env = "MATERNOVA_MAX_ATTEMPTS", default_value_t = AuthorityConfig::DEFAULT_MAX_ATTEMPTS.get())]
    pub max_attempts: u32,

    /// Log output format. Logs always go to stderr.
    ///
    /// Environment variable: `MATERNOVA_LOG_FORMAT`
    #[arg(long, global = true, env = "MATERNOVA_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CliCommand {
    /// Log a beneficiary in, issuing an identifier on first login.
    Login {
        /// asha, pregnant, elderly or infant_family.
        #[arg(long)]
        role: String,
        /// Full name. Matched case-insensitively against existing records.
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        village: Option<String>,
        /// Identifier of the responsible ASHA worker.
        #[arg(long)]
        asha: Option<String>,
    },
    /// Re-derive the counters from the ledger and print the report.
    Reconcile,
    /// Explain what each identifier encodes.
    Inspect {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyArg {
    /// Count every role, ASHA and unrecognised roles included.
    Sequential,
    /// Derive ASHA and unrecognised-role identifiers from the clock.
    Clock,
}

impl From<PolicyArg> for IssuancePolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Sequential => Self::Sequential,
            PolicyArg::Clock => Self::Clock,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login(NewBeneficiary),
    Reconcile,
    Inspect(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub ledger: PathBuf,
    pub authority: AuthorityConfig,
    pub log_format: LogFormat,
    pub command: Command,
}

impl TryFrom<CliArgs> for AppConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let Some(max_attempts) = NonZeroU32::new(args.max_attempts) else {
            bail!("MATERNOVA_MAX_ATTEMPTS must be greater than 0");
        };

        let command = match args.command {
            CliCommand::Login {
                role,
                name,
                phone,
                village,
                asha,
            } => {
                let role: Role = role.parse()?;
                let mut new = NewBeneficiary::new(role, name);
                new.phone = phone;
                new.village = village;
                if let Some(asha) = asha {
                    let asha: PatientId = asha.parse().context("invalid --asha identifier")?;
                    new = new.assigned_to(asha);
                }
                new.validate()?;
                Command::Login(new)
            }
            CliCommand::Reconcile => Command::Reconcile,
            CliCommand::Inspect { ids } => Command::Inspect(ids),
        };

        Ok(Self {
            ledger: args.ledger,
            authority: AuthorityConfig::default()
                .with_policy(args.policy.into())
                .with_max_attempts(max_attempts),
            log_format: args.log_format,
            command,
        })
    }
}
