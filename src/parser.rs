//! Parse the structured pieces of user input: dates, money amounts,
//! name lists and numeric ids.
//!
//! The menu shell reads one line per prompt; each helper here consumes a
//! whole trimmed line and returns a typed value or an `InputError`. The
//! grammar is small but fiddly enough (two date separators would be worse,
//! money with `.` or `,`) that we use nom.

use chrono::NaiveDate;
use nom::{
    character::complete::{char, digit1, multispace0, multispace1},
    combinator::{all_consuming, map_res},
    multi::separated_list1,
    sequence::{preceded, tuple},
    AsChar, IResult, InputTakeAtPosition,
};

use crate::error::InputError;

/// Parse a date in dd/mm/yyyy form.
pub fn parse_date(s: &str) -> IResult<&str, NaiveDate> {
    map_res(
        tuple((digit1, char('/'), digit1, char('/'), digit1)),
        |(day, _, month, _, year): (&str, char, &str, char, &str)| {
            let day: u32 = day.parse().map_err(|_| ())?;
            let month: u32 = month.parse().map_err(|_| ())?;
            let year: i32 = year.parse().map_err(|_| ())?;
            NaiveDate::from_ymd_opt(year, month, day).ok_or(())
        },
    )(s)
}

fn money1(s: &str) -> IResult<&str, &str> {
    s.split_at_position1_complete(
        |item| !item.is_dec_digit() && item != ',' && item != '.',
        nom::error::ErrorKind::Float,
    )
}

/// Parse a money amount: an integer part with an optional fractional part
/// of at most two digits, separated by either '.' or ','.
pub fn parse_amount(s: &str) -> IResult<&str, f64> {
    fn do_parse(x: &str) -> Result<f64, ()> {
        let components: Vec<_> = x.split(&[',', '.']).collect();
        match components[..] {
            [integer_part] => integer_part.parse::<f64>().map_err(|_| ()),
            [integer_part, fractional_part] => {
                if fractional_part.is_empty() || fractional_part.len() > 2 {
                    return Err(());
                }
                format!("{integer_part}.{fractional_part}")
                    .parse::<f64>()
                    .map_err(|_| ())
            }
            _ => Err(()),
        }
    }

    map_res(money1, do_parse)(s)
}

fn name1(s: &str) -> IResult<&str, &str> {
    s.split_at_position1_complete(|item| item.is_whitespace(), nom::error::ErrorKind::Alpha)
}

/// Parse a whitespace-separated list of name tokens. Whether each token is
/// a well-formed name is checked by the validator, which has the better
/// error messages.
pub fn parse_names(s: &str) -> IResult<&str, Vec<&str>> {
    preceded(multispace0, separated_list1(multispace1, name1))(s)
}

fn parse_integer(s: &str) -> IResult<&str, i64> {
    map_res(digit1, |digits: &str| digits.parse::<i64>())(s)
}

/// Parse a full input line as a date.
pub fn date_from_input(line: &str) -> Result<NaiveDate, InputError> {
    all_consuming(parse_date)(line.trim())
        .map(|(_, date)| date)
        .map_err(|_| InputError::invalid_date(line.trim().to_string()))
}

/// Parse a full input line as a money amount.
pub fn amount_from_input(line: &str) -> Result<f64, InputError> {
    all_consuming(parse_amount)(line.trim())
        .map(|(_, amount)| amount)
        .map_err(|_| InputError::invalid_cost(line.trim().to_string()))
}

/// Parse a full input line as a list of name tokens.
pub fn names_from_input(line: &str) -> Result<Vec<String>, InputError> {
    all_consuming(parse_names)(line.trim())
        .map(|(_, names)| names.into_iter().map(|n| n.to_string()).collect())
        .map_err(|_| InputError::debtors_not_provided())
}

/// Parse a full input line as an expense id.
pub fn expense_id_from_input(line: &str) -> Result<i64, InputError> {
    all_consuming(parse_integer)(line.trim())
        .map(|(_, id)| id)
        .map_err(|_| InputError::invalid_expense_id(line.trim().to_string()))
}

/// Parse a full input line as a debtor id.
pub fn debtor_id_from_input(line: &str) -> Result<i64, InputError> {
    all_consuming(parse_integer)(line.trim())
        .map(|(_, id)| id)
        .map_err(|_| InputError::invalid_debtor_id(line.trim().to_string()))
}
