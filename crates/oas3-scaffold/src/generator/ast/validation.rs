use std::fmt;

use proc_macro2::{Literal, TokenStream};
use quote::{ToTokens, quote};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatDirective {
  Email,
  Ip,
  Ipv4,
  Ipv6,
}

impl FormatDirective {
  pub fn from_format(format: &str) -> Option<Self> {
    match format {
      "email" => Some(Self::Email),
      "ip" => Some(Self::Ip),
      "ipv4" => Some(Self::Ipv4),
      "ipv6" => Some(Self::Ipv6),
      _ => None,
    }
  }
}

/// A single field-level validation rule, kept in emission order.
///
/// Rules after [`ValidationDirective::Dive`] apply to each element of a list.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationDirective {
  Required,
  OmitIfAbsent,
  LengthMin(u64),
  LengthMax(u64),
  NumericMin(f64),
  NumericMax(f64),
  OneOf(Vec<String>),
  Format(FormatDirective),
  ItemsMin(u64),
  ItemsMax(u64),
  Unique,
  Dive,
}

impl fmt::Display for ValidationDirective {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Required => f.write_str("required"),
      Self::OmitIfAbsent => f.write_str("omitempty"),
      Self::LengthMin(n) | Self::ItemsMin(n) => write!(f, "min={n}"),
      Self::LengthMax(n) | Self::ItemsMax(n) => write!(f, "max={n}"),
      Self::NumericMin(n) => write!(f, "min={n}"),
      Self::NumericMax(n) => write!(f, "max={n}"),
      Self::OneOf(values) => {
        let rendered: Vec<String> = values
          .iter()
          .map(|value| {
            if value.chars().any(char::is_whitespace) {
              format!("'{value}'")
            } else {
              value.clone()
            }
          })
          .collect();
        write!(f, "oneof={}", rendered.join(" "))
      }
      Self::Format(FormatDirective::Email) => f.write_str("email"),
      Self::Format(FormatDirective::Ip) => f.write_str("ip"),
      Self::Format(FormatDirective::Ipv4) => f.write_str("ipv4"),
      Self::Format(FormatDirective::Ipv6) => f.write_str("ipv6"),
      Self::Unique => f.write_str("unique"),
      Self::Dive => f.write_str("dive"),
    }
  }
}

impl ToTokens for ValidationDirective {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let rule = match self {
      Self::Required => quote! { Required },
      Self::OmitIfAbsent => quote! { OmitIfAbsent },
      Self::LengthMin(n) => {
        let n = Literal::u64_unsuffixed(*n);
        quote! { LengthMin(#n) }
      }
      Self::LengthMax(n) => {
        let n = Literal::u64_unsuffixed(*n);
        quote! { LengthMax(#n) }
      }
      Self::NumericMin(n) => {
        let n = Literal::f64_unsuffixed(*n);
        quote! { Min(#n) }
      }
      Self::NumericMax(n) => {
        let n = Literal::f64_unsuffixed(*n);
        quote! { Max(#n) }
      }
      Self::OneOf(values) => quote! { OneOf(&[#(#values),*]) },
      Self::Format(FormatDirective::Email) => quote! { Email },
      Self::Format(FormatDirective::Ip) => quote! { Ip },
      Self::Format(FormatDirective::Ipv4) => quote! { Ipv4 },
      Self::Format(FormatDirective::Ipv6) => quote! { Ipv6 },
      Self::ItemsMin(n) => {
        let n = Literal::u64_unsuffixed(*n);
        quote! { ItemsMin(#n) }
      }
      Self::ItemsMax(n) => {
        let n = Literal::u64_unsuffixed(*n);
        quote! { ItemsMax(#n) }
      }
      Self::Unique => quote! { Unique },
      Self::Dive => quote! { Dive },
    };
    tokens.extend(quote! { support::Rule::#rule });
  }
}

/// Comma-joined text form of a directive list, as shown in generated field docs.
pub fn directive_summary(directives: &[ValidationDirective]) -> String {
  directives.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
}
