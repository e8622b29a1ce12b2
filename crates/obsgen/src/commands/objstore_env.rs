//! objstore-env command

use anyhow::Result;
use obsgen_core::objstore_env_vars;

use crate::cli::ObjstoreEnvArgs;

pub fn run(args: ObjstoreEnvArgs) -> Result<()> {
    let env = objstore_env_vars(&args.secret);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&env)?);
    } else {
        print!("{}", serde_yaml_ng::to_string(&env)?);
    }

    Ok(())
}
