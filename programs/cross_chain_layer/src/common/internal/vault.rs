use anchor_lang::{
    prelude::*,
    system_program::{self, Transfer},
};

use crate::common::VAULT_SEED;

/// Moves lamports from a signer into the vault.
pub fn deposit_to_vault<'info>(
    system_program: &Program<'info, System>,
    from: AccountInfo<'info>,
    vault: AccountInfo<'info>,
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }

    let cpi_ctx = CpiContext::new(
        system_program.to_account_info(),
        Transfer { from, to: vault },
    );
    system_program::transfer(cpi_ctx, amount)
}

/// Moves lamports out of the vault, signing with its seeds.
pub fn withdraw_from_vault<'info>(
    system_program: &Program<'info, System>,
    vault: AccountInfo<'info>,
    vault_bump: u8,
    to: AccountInfo<'info>,
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }

    let seeds: &[&[&[u8]]] = &[&[VAULT_SEED, &[vault_bump]]];
    let cpi_ctx = CpiContext::new_with_signer(
        system_program.to_account_info(),
        Transfer { from: vault, to },
        seeds,
    );
    system_program::transfer(cpi_ctx, amount)
}

/// Whether `to` can hold `amount` more lamports without ending up below the
/// rent-exempt minimum. Executable accounts never accept forwarded value.
pub fn can_receive(to: &AccountInfo, amount: u64, rent: &Rent) -> bool {
    if to.executable {
        return false;
    }
    if amount == 0 {
        return true;
    }

    let balance = to.lamports().saturating_add(amount);
    balance >= rent.minimum_balance(to.data_len())
}

/// `can_receive` over a set of credits. Credits to the same account are
/// summed before the check.
pub fn can_receive_all(credits: &[(&AccountInfo, u64)], rent: &Rent) -> bool {
    let mut totals: Vec<(&AccountInfo, u64)> = Vec::with_capacity(credits.len());
    for (account, amount) in credits {
        match totals.iter_mut().find(|(seen, _)| seen.key == account.key) {
            Some((_, total)) => *total = total.saturating_add(*amount),
            None => totals.push((*account, *amount)),
        }
    }

    totals
        .iter()
        .all(|(account, amount)| can_receive(account, *amount, rent))
}
