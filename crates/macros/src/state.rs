use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    Error, Field, Fields, FieldsNamed, Generics, Ident, ItemStruct, Result, Type,
    parse::{Parse, ParseStream},
};

/// The fields a state struct must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Iteration,
    Iterate,
    CriterionState,
}

impl Role {
    const ALL: [Role; 3] = [Role::Iteration, Role::Iterate, Role::CriterionState];

    /// The word used inside `#[state(...)]`.
    fn marker(self) -> &'static str {
        match self {
            Role::Iteration => "iteration",
            Role::Iterate => "iterate",
            Role::CriterionState => "criterion_state",
        }
    }

    /// The field name used when no field carries the marker.
    fn default_name(self) -> &'static str {
        match self {
            Role::Iteration => "iteration",
            Role::Iterate => "iterate",
            Role::CriterionState => "stopping_criterion_state",
        }
    }
}

#[derive(Debug)]
pub(crate) struct Parsed {
    ident: Ident,
    generics: Generics,
    iteration: Ident,
    iterate: Ident,
    iterate_ty: Type,
    criterion_state: Ident,
}

impl Parse for Parsed {
    /// Parses a struct definition and locates the fields for each role.
    fn parse(input: ParseStream) -> Result<Self> {
        let ItemStruct {
            ident,
            generics,
            fields,
            ..
        } = input.parse()?;

        let Fields::Named(fields) = fields else {
            return Err(Error::new_spanned(
                ident,
                "Unsupported struct type. This macro requires a struct with named fields.",
            ));
        };

        let mut marked: [Option<&Field>; 3] = [None; 3];
        for field in &fields.named {
            for role in marked_roles(field)? {
                let slot = &mut marked[role as usize];
                if slot.is_some() {
                    return Err(Error::new_spanned(
                        field,
                        format!("Duplicate `#[state({})]` field.", role.marker()),
                    ));
                }
                *slot = Some(field);
            }
        }

        let find = |role| find_field(&ident, &fields, &marked, role);

        let iteration = field_name(find(Role::Iteration)?)?;
        let iterate_field = find(Role::Iterate)?;
        let iterate = field_name(iterate_field)?;
        let iterate_ty = iterate_field.ty.clone();
        let criterion_state = field_name(find(Role::CriterionState)?)?;

        Ok(Parsed {
            ident,
            generics,
            iteration,
            iterate,
            iterate_ty,
            criterion_state,
        })
    }
}

impl Parsed {
    /// Generates the `State` implementation.
    pub fn expand(self) -> TokenStream {
        let Parsed {
            ident,
            generics,
            iteration,
            iterate,
            iterate_ty,
            criterion_state,
        } = self;
        let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

        quote! {
            impl #impl_generics ::cadence_core::State for #ident #ty_generics #where_clause {
                type Iterate = #iterate_ty;

                fn iteration(&self) -> usize {
                    self.#iteration
                }

                fn set_iteration(&mut self, iteration: usize) {
                    self.#iteration = iteration;
                }

                fn iterate(&self) -> &Self::Iterate {
                    &self.#iterate
                }

                fn stopping_criterion_state(&self) -> &::cadence_core::CriterionState {
                    &self.#criterion_state
                }

                fn stopping_criterion_state_mut(&mut self) -> &mut ::cadence_core::CriterionState {
                    &mut self.#criterion_state
                }
            }
        }
    }
}

/// Returns the field marked with `role`, or else the one with its default name.
fn find_field<'a>(
    ident: &Ident,
    fields: &'a FieldsNamed,
    marked: &[Option<&'a Field>; 3],
    role: Role,
) -> Result<&'a Field> {
    marked[role as usize]
        .or_else(|| {
            fields
                .named
                .iter()
                .find(|field| field.ident.as_ref().is_some_and(|name| name == role.default_name()))
        })
        .ok_or_else(|| {
            Error::new_spanned(
                ident,
                format!(
                    "Missing `{}` field. Name a field `{}` or mark one with `#[state({})]`.",
                    role.marker(),
                    role.default_name(),
                    role.marker(),
                ),
            )
        })
}

/// Collects the roles a field is marked with through `#[state(...)]`.
fn marked_roles(field: &Field) -> Result<Vec<Role>> {
    let mut roles = Vec::new();
    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("state")) {
        attr.parse_nested_meta(|meta| {
            let role = Role::ALL
                .into_iter()
                .find(|role| meta.path.is_ident(role.marker()))
                .ok_or_else(|| {
                    meta.error(
                        "Unsupported state marker. Expected `iteration`, `iterate`, or `criterion_state`.",
                    )
                })?;
            roles.push(role);
            Ok(())
        })?;
    }
    Ok(roles)
}

fn field_name(field: &Field) -> Result<Ident> {
    field
        .ident
        .clone()
        .ok_or_else(|| Error::new_spanned(field, "Expected a named field."))
}
