//! Address book.

use anyhow::Result;
use duka_commerce::account::{NewAddress, SavedAddress};
use duka_commerce::CommerceError;

use super::{AddressesArgs, AddressesCommand, NewAddressArgs};
use crate::context::Context;

/// Run the addresses command.
pub async fn run(args: AddressesArgs, ctx: &Context) -> Result<()> {
    match args.command.unwrap_or(AddressesCommand::List) {
        AddressesCommand::List => list_addresses(ctx).await,
        AddressesCommand::Add(new) => add_address(new, ctx).await,
    }
}

async fn list_addresses(ctx: &Context) -> Result<()> {
    let addresses = ctx.backend.list_addresses().await?;

    if ctx.output.is_json() {
        ctx.output.json(&addresses);
        return Ok(());
    }

    ctx.output.header("Saved Addresses");
    if addresses.is_empty() {
        ctx.output.info("No saved addresses");
        return Ok(());
    }

    for address in &addresses {
        print_address(address, ctx);
    }
    Ok(())
}

async fn add_address(args: NewAddressArgs, ctx: &Context) -> Result<()> {
    let new = NewAddress::from(args);

    let saved = match ctx.backend.add_address(new).await {
        Ok(saved) => saved,
        Err(CommerceError::Validation(errors)) => {
            ctx.output.field_errors(&errors);
            anyhow::bail!("Address not saved: {} field(s) missing", errors.len());
        }
        Err(e) => return Err(e.into()),
    };

    if ctx.output.is_json() {
        ctx.output.json(&saved);
        return Ok(());
    }

    ctx.output.success(&format!("Saved address {}", saved.id));
    print_address(&saved, ctx);
    ctx.output
        .debug("the address book is in memory; this address lasts for this run only");
    Ok(())
}

fn print_address(address: &SavedAddress, ctx: &Context) {
    let mut title = format!("{}  {}", address.id, address.full_name());
    if let Some(label) = address.label {
        title.push_str(&format!(" [{}]", label));
    }
    if address.is_default {
        title.push_str(" (default)");
    }
    ctx.output.list_item(&title);
    ctx.output.kv("Address", &address.to_order_address().one_line());
    ctx.output.kv("Phone", &address.phone_number);
}

impl From<NewAddressArgs> for NewAddress {
    fn from(args: NewAddressArgs) -> Self {
        NewAddress {
            is_default: args.default,
            first_name: args.first_name,
            last_name: args.last_name,
            address_line1: args.line1,
            address_line2: args.line2,
            city: args.city,
            state: args.state,
            postal_code: args.postal_code,
            country: args.country,
            phone_number: args.phone,
            label: args.label,
        }
    }
}
