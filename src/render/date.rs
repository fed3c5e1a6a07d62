// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ata-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ata and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use chrono::NaiveDate;

const INPUT_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_FORMAT: &str = "%d-%m-%Y";

/// Reorders an input-order date (`YYYY-MM-DD`) into display order (`DD-MM-YYYY`).
///
/// Anything that is not a valid calendar date in input order is returned trimmed but otherwise
/// untouched.
pub fn display_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.len() != 10 {
        return trimmed.to_owned();
    }

    match NaiveDate::parse_from_str(trimmed, INPUT_FORMAT) {
        Ok(date) => date.format(DISPLAY_FORMAT).to_string(),
        Err(_) => trimmed.to_owned(),
    }
}
