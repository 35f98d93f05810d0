//! `.env` loading. Kept in its own test binary: dotenvy writes straight into
//! the process environment, which a `Jail` does not roll back.

use figment::Jail;
use wf_config::PipelineConfig;

#[test]
fn dotenv_at_workspace_root_is_found_from_a_crate_dir() {
    Jail::expect_with(|jail| {
        jail.create_file(".env", "DJ_HOST=from-dotenv.db\nDATABASE_PREFIX=env_\n")?;
        let crate_dir = jail.directory().join("crates").join("wf-demo");

        let config = PipelineConfig::load_with_dotenv_in(&crate_dir).expect("config loads");
        assert_eq!(config.database.host, "from-dotenv.db");
        assert_eq!(config.custom.database_prefix, "env_");
        Ok(())
    });
}

#[test]
fn shell_variable_wins_over_dotenv() {
    Jail::expect_with(|jail| {
        jail.create_file(".env", "DJ_USER=from-dotenv\n")?;
        jail.set_env("DJ_USER", "from-shell");

        let config = PipelineConfig::load_with_dotenv_in(jail.directory()).expect("config loads");
        assert_eq!(config.database.user, "from-shell");
        Ok(())
    });
}
