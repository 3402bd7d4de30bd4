use once_cell::sync::OnceCell;
use tracing_subscriber::fmt::Subscriber;
use tracing_subscriber::EnvFilter;

static INIT: OnceCell<()> = OnceCell::new();

/// Install the default tracing subscriber. Safe to call more than once;
/// does nothing if the host application already set a global subscriber.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = Subscriber::builder()
            .with_env_filter(filter)
            .with_file(true)
            .with_line_number(true)
            .finish();

        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}
