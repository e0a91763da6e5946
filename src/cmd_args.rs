use std::ffi::OsString;

pub use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct ClapArgs {
    /// Repository address (host:port). Overrides the profile and EXISTLINE_HOST.
    #[clap(short = 's', long = "server", value_name = "HOST:PORT", help = "repository address")]
    server: Option<String>,

    /// Suppress the startup banner
    #[clap(short = 'q', long, help = "suppress startup banner")]
    quiet: bool,

    /// Ask the server not to indent its responses
    #[clap(short = 'i', long = "no-indent", help = "disable indentation of responses")]
    no_indent: bool,

    /// Run every query in FILE once, print a timing table and exit
    #[clap(short = 'b', long = "bench", value_name = "FILE", help = "run a query benchmark")]
    bench: Option<String>,

    /// Store FILE in the repository, optionally below COLLECTION, and exit
    #[clap(
        short = 'p',
        long = "parse",
        num_args = 1..=2,
        value_names = ["FILE", "COLLECTION"],
        help = "store a document"
    )]
    parse: Option<Vec<String>>,

    /// Profile name
    /// Optional. Section of the profile file to read. Default is 'default'.
    #[clap(long, default_value = "default", help = "profile name")]
    profile: String,

    /// Per-request timeout in seconds, 0 disables it
    #[clap(short = 't', long, value_name = "SECS", help = "request timeout in seconds")]
    timeout: Option<u64>,

    /// User for HTTP basic authentication
    #[clap(short = 'u', long, help = "user name")]
    user: Option<String>,

    /// Password for HTTP basic authentication
    #[clap(long, help = "password")]
    password: Option<String>,

    /// File holding one complete request body to send
    #[clap(value_name = "REQUEST_FILE")]
    request_file: Option<String>,
}

/// A file to store non-interactively, with its optional target collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreArgs {
    pub file: String,
    pub collection: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CommandLineArgs {
    server: Option<String>,
    quiet: bool,
    indent: bool,
    bench: Option<String>,
    store: Option<StoreArgs>,
    profile: String,
    timeout: Option<u64>,
    user: Option<String>,
    password: Option<String>,
    request_file: Option<String>,
}

impl CommandLineArgs {
    pub fn parse() -> Self {
        Self::from_clap(ClapArgs::parse())
    }

    pub fn parse_from<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::from_clap(ClapArgs::parse_from(itr))
    }

    fn from_clap(args: ClapArgs) -> Self {
        let store = args.parse.and_then(|values| {
            let mut values = values.into_iter();
            values.next().map(|file| StoreArgs {
                file,
                collection: values.next(),
            })
        });

        Self {
            server: args.server,
            quiet: args.quiet,
            indent: !args.no_indent,
            bench: args.bench,
            store,
            profile: args.profile,
            timeout: args.timeout,
            user: args.user,
            password: args.password,
            request_file: args.request_file,
        }
    }

    pub fn server(&self) -> Option<&str> {
        self.server.as_deref()
    }

    pub fn quiet(&self) -> bool {
        self.quiet
    }

    pub fn indent(&self) -> bool {
        self.indent
    }

    pub fn bench(&self) -> Option<&str> {
        self.bench.as_deref()
    }

    pub fn store(&self) -> Option<&StoreArgs> {
        self.store.as_ref()
    }

    pub fn profile(&self) -> &String {
        &self.profile
    }

    pub fn timeout(&self) -> Option<u64> {
        self.timeout
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn request_file(&self) -> Option<&str> {
        self.request_file.as_deref()
    }
}
