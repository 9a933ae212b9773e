//! Line parser for the register prompt.

use chrono::NaiveDate;
use uuid::Uuid;

use caisse_core::keypad::Key;
use caisse_core::Action;

use super::{Command, CommandError, TicketRef};

/// Parses one input line. Blank lines and `#` comments give `Command::Nothing`.
pub fn parse_line(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(Command::Nothing);
    }

    let mut words = line.split_whitespace();
    let name = words.next().unwrap_or_default().to_lowercase();
    let args: Vec<&str> = words.collect();

    let command = match name.as_str() {
        "add" => {
            let product_id = required(&args, 0, "add", "product id")?;
            let quantity = match args.get(1) {
                Some(q) => parse_int(q)?,
                None => 1,
            };
            Command::Action(Action::AddItem {
                product_id,
                quantity,
            })
        }
        "select" => Command::Action(Action::SelectProduct {
            product_id: required(&args, 0, "select", "product id")?,
        }),
        "qty" => Command::Action(Action::SetQuantity {
            product_id: required(&args, 0, "qty", "product id")?,
            quantity: parse_int(&required(&args, 1, "qty", "quantity")?)?,
        }),
        "remove" | "rm" => Command::Action(Action::RemoveItem {
            product_id: required(&args, 0, "remove", "product id")?,
        }),
        "key" | "keys" => {
            if args.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: "key",
                    argument: "key",
                });
            }
            let keys = args
                .iter()
                .map(|k| k.parse::<Key>())
                .collect::<Result<Vec<_>, _>>()?;
            Command::Keys(keys)
        }
        "new" => Command::Action(Action::StartNewTicket),
        "hold" => Command::Action(Action::Hold),
        "held" => Command::Held,
        "retrieve" => Command::Retrieve(parse_ticket_ref(&required(
            &args,
            0,
            "retrieve",
            "ticket number or id",
        )?)?),
        "discount" => match args.first() {
            None => Command::Action(Action::OpenDiscount),
            Some(value) => Command::Action(Action::ApplyDiscount {
                input: value.trim_end_matches('%').to_string(),
            }),
        },
        "pay" => match args.first() {
            None => Command::Action(Action::OpenPayment),
            Some(method) => Command::Action(Action::SubmitPayment {
                method_id: method.to_string(),
                room_number: (args.len() > 1).then(|| args[1..].join(" ")),
            }),
        },
        "receipt" => Command::Receipt(args.first().map(|s| s.to_string())),
        "cancel" => Command::Action(Action::Cancel),
        "confirm" | "yes" => Command::Action(Action::Confirm),
        "dismiss" | "close" | "no" => Command::Action(Action::Dismiss),
        "void" => Command::Void(required(&args, 0, "void", "invoice or transaction id")?),
        "ledger" => Command::Ledger,
        "report" => {
            let start = args.first().map(|d| parse_date(d)).transpose()?;
            let end = args.get(1).map(|d| parse_date(d)).transpose()?;
            Command::Report { start, end }
        }
        "export" => Command::Export,
        "products" => {
            let (category, query) = match args.first() {
                Some(first) if first.starts_with('@') => {
                    (Some(first[1..].to_string()), args[1..].join(" "))
                }
                _ => (None, args.join(" ")),
            };
            Command::Products { category, query }
        }
        "seller" => match args.first() {
            None => Command::Sellers,
            Some(id) => Command::Action(Action::SelectSeller {
                seller_id: id.to_string(),
            }),
        },
        "totals" | "ticket" => Command::Totals,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(command)
}

fn required(
    args: &[&str],
    index: usize,
    command: &'static str,
    argument: &'static str,
) -> Result<String, CommandError> {
    args.get(index)
        .map(|s| s.to_string())
        .ok_or(CommandError::MissingArgument { command, argument })
}

fn parse_int(text: &str) -> Result<i64, CommandError> {
    text.parse()
        .map_err(|_| CommandError::InvalidNumber(text.to_string()))
}

fn parse_date(text: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| CommandError::InvalidDate(text.to_string()))
}

fn parse_ticket_ref(text: &str) -> Result<TicketRef, CommandError> {
    if let Ok(id) = Uuid::parse_str(text) {
        return Ok(TicketRef::Id(id));
    }
    match text.parse::<usize>() {
        Ok(n) if n > 0 => Ok(TicketRef::Position(n)),
        _ => Err(CommandError::InvalidTicketRef(text.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_and_comment_lines() {
        assert_eq!(parse_line("   ").unwrap(), Command::Nothing);
        assert_eq!(parse_line("# note").unwrap(), Command::Nothing);
    }

    #[test]
    fn test_add_defaults_to_one() {
        assert_eq!(
            parse_line("add prod_pizza_margarita").unwrap(),
            Command::Action(Action::AddItem {
                product_id: "prod_pizza_margarita".to_string(),
                quantity: 1,
            })
        );
        assert_eq!(
            parse_line("ADD prod_pizza_margarita 3").unwrap(),
            Command::Action(Action::AddItem {
                product_id: "prod_pizza_margarita".to_string(),
                quantity: 3,
            })
        );
    }

    #[test]
    fn test_missing_and_invalid_arguments() {
        assert!(matches!(
            parse_line("qty prod_x"),
            Err(CommandError::MissingArgument {
                command: "qty",
                ..
            })
        ));
        assert!(matches!(
            parse_line("add prod_x two"),
            Err(CommandError::InvalidNumber(_))
        ));
        assert!(matches!(
            parse_line("frobnicate"),
            Err(CommandError::Unknown(_))
        ));
    }

    #[test]
    fn test_keys() {
        assert_eq!(
            parse_line("key qty 1 2 enter").unwrap(),
            Command::Keys(vec![Key::Qty, Key::Digit(1), Key::Digit(2), Key::Enter])
        );
        assert!(matches!(
            parse_line("key banana"),
            Err(CommandError::Key(_))
        ));
    }

    #[test]
    fn test_discount_and_pay() {
        assert_eq!(
            parse_line("discount").unwrap(),
            Command::Action(Action::OpenDiscount)
        );
        assert_eq!(
            parse_line("discount 12.5%").unwrap(),
            Command::Action(Action::ApplyDiscount {
                input: "12.5".to_string()
            })
        );
        assert_eq!(
            parse_line("pay room_transfer 2 14").unwrap(),
            Command::Action(Action::SubmitPayment {
                method_id: "room_transfer".to_string(),
                room_number: Some("2 14".to_string()),
            })
        );
        assert_eq!(
            parse_line("pay cash").unwrap(),
            Command::Action(Action::SubmitPayment {
                method_id: "cash".to_string(),
                room_number: None,
            })
        );
    }

    #[test]
    fn test_retrieve_by_position_or_id() {
        assert_eq!(
            parse_line("retrieve 2").unwrap(),
            Command::Retrieve(TicketRef::Position(2))
        );
        let id = Uuid::new_v4();
        assert_eq!(
            parse_line(&format!("retrieve {}", id)).unwrap(),
            Command::Retrieve(TicketRef::Id(id))
        );
        assert!(parse_line("retrieve 0").is_err());
    }

    #[test]
    fn test_report_dates() {
        assert_eq!(
            parse_line("report 2024-03-01 2024-03-31").unwrap(),
            Command::Report {
                start: NaiveDate::from_ymd_opt(2024, 3, 1),
                end: NaiveDate::from_ymd_opt(2024, 3, 31),
            }
        );
        assert!(matches!(
            parse_line("report 03/01/2024"),
            Err(CommandError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_products_with_category() {
        assert_eq!(
            parse_line("products @cat_pizzas quatre saisons").unwrap(),
            Command::Products {
                category: Some("cat_pizzas".to_string()),
                query: "quatre saisons".to_string(),
            }
        );
        assert_eq!(
            parse_line("products").unwrap(),
            Command::Products {
                category: None,
                query: String::new(),
            }
        );
    }
}
