//! Policy controller endpoint commands.

use serde::Serialize;

use netprov_core::{AccessRegistrar, MacAddress, ProvisionConfig};

use crate::cli::{EndpointArgs, EndpointCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct GroupView {
    name: String,
    id: String,
}

#[derive(Serialize)]
struct RegistrationView {
    mac: MacAddress,
    group: String,
    #[serde(flatten)]
    registration: netprov_core::Registration,
}

pub async fn handle(
    config: &ProvisionConfig,
    args: EndpointArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let registrar = AccessRegistrar::connect(config)?;

    let out = match args.command {
        EndpointCommand::Group { name } => {
            let id = registrar.group_id(&name).await?;
            let view = GroupView { name, id };
            output::render_single(
                global.output,
                &view,
                |v| vec![("Group", v.name.clone()), ("ID", v.id.clone())],
                |v| v.id.clone(),
            )
        }
        EndpointCommand::Register { mac, group } => {
            let mac = MacAddress::parse(&mac)?;
            let registration = registrar.register(&mac, &group).await?;
            let view = RegistrationView {
                mac,
                group,
                registration,
            };
            let color = util::color(global);
            output::render_single(
                global.output,
                &view,
                |v| {
                    vec![
                        ("MAC", v.mac.to_string()),
                        ("Group", format!("{} ({})", v.group, v.registration.group_id)),
                        (
                            "Outcome",
                            output::paint_status(&v.registration.outcome.to_string(), color),
                        ),
                        ("HTTP Status", v.registration.status.to_string()),
                    ]
                },
                |v| v.registration.outcome.to_string(),
            )
        }
    };

    output::print_output(&out, global.quiet);
    Ok(())
}
