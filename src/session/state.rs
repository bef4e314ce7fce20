use crate::core::{Asset, Field};
use serde::{Deserialize, Serialize};

/// User intent for one swap form. Changed only through [`SwapState::reduce`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SwapState {
    pub independent_field: Field,
    /// Raw decimal string exactly as typed.
    pub typed_value: String,
    pub input_currency: Option<Asset>,
    pub output_currency: Option<Asset>,
    pub recipient: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapAction {
    SelectCurrency { field: Field, asset: Asset },
    SwitchTokens,
    TypeInput { field: Field, typed_value: String },
    SetRecipient(Option<String>),
    ClearCurrency(Field),
    ReplaceState(SwapState),
}

impl SwapState {
    /// Session opened with an input token already chosen.
    pub fn prefilled(input: Asset) -> Self {
        Self {
            input_currency: Some(input),
            ..Self::default()
        }
    }

    pub fn currency(&self, field: Field) -> Option<&Asset> {
        match field {
            Field::Input => self.input_currency.as_ref(),
            Field::Output => self.output_currency.as_ref(),
        }
    }

    fn currency_mut(&mut self, field: Field) -> &mut Option<Asset> {
        match field {
            Field::Input => &mut self.input_currency,
            Field::Output => &mut self.output_currency,
        }
    }

    pub fn dependent_field(&self) -> Field {
        self.independent_field.opposite()
    }

    /// Pure transition: returns the next state, `self` is untouched.
    pub fn reduce(&self, action: SwapAction) -> SwapState {
        let mut next = self.clone();

        match action {
            SwapAction::SelectCurrency { field, asset } => {
                let other = field.opposite();
                if next.currency(other) == Some(&asset) {
                    // Picking the asset already on the other side swaps the sides
                    let previous = next.currency_mut(field).take();
                    *next.currency_mut(other) = previous;
                    *next.currency_mut(field) = Some(asset);
                    next.independent_field = next.independent_field.opposite();
                } else {
                    *next.currency_mut(field) = Some(asset);
                }
            }
            SwapAction::SwitchTokens => {
                std::mem::swap(&mut next.input_currency, &mut next.output_currency);
                next.independent_field = next.independent_field.opposite();
            }
            SwapAction::TypeInput { field, typed_value } => {
                next.independent_field = field;
                next.typed_value = typed_value;
            }
            SwapAction::SetRecipient(recipient) => {
                next.recipient = recipient;
            }
            SwapAction::ClearCurrency(field) => {
                *next.currency_mut(field) = None;
            }
            SwapAction::ReplaceState(state) => {
                next = state;
            }
        }

        next
    }
}
