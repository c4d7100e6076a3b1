#[derive(Debug, thiserror::Error)]
#[error("invalid type value '{0}'")]
pub struct TypeValueError(pub String);

macro_rules! strenum {
	( $(pub enum $enum_name:ident { $($variant:ident => $repr:literal),* $(,)? };)+ ) => {
		$(
			#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
			pub enum $enum_name {
				$($variant,)*
			}

			impl AsRef<str> for $enum_name {
				fn as_ref(&self) -> &str {
					match self {
						$(Self::$variant => $repr,)*
					}
				}
			}

			impl TryFrom<&str> for $enum_name {
				type Error = $crate::macros::TypeValueError;

				fn try_from(value: &str) -> Result<Self, Self::Error> {
					match value {
						$($repr => Ok(Self::$variant),)*
						_ => Err($crate::macros::TypeValueError(value.to_string())),
					}
				}
			}

			impl std::fmt::Display for $enum_name {
				fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
					f.write_str(self.as_ref())
				}
			}
		)*
	};
}

pub(crate) use strenum;

macro_rules! getter {
	($name:ident -> &str) => {
		fn $name(&self) -> Option<&str> {
			self.get(stringify!($name))?.as_str()
		}
	};

	($name:ident::$rename:ident -> &str) => {
		fn $name(&self) -> Option<&str> {
			self.get(stringify!($rename))?.as_str()
		}
	};

	($name:ident -> u64) => {
		fn $name(&self) -> Option<u64> {
			self.get(stringify!($name))?.as_u64()
		}
	};

	($name:ident::$rename:ident -> u64) => {
		fn $name(&self) -> Option<u64> {
			self.get(stringify!($rename))?.as_u64()
		}
	};

	($name:ident -> node) => {
		fn $name(&self) -> $crate::Node<'_> {
			$crate::Node::from(self.get(stringify!($name)))
		}
	};

	($name:ident::$rename:ident -> node) => {
		fn $name(&self) -> $crate::Node<'_> {
			$crate::Node::from(self.get(stringify!($rename)))
		}
	};
}

pub(crate) use getter;

macro_rules! setter {
	($name:ident -> &str) => {
		paste::item! {
			fn [< set_$name >](mut self, val: Option<&str>) -> Self {
				$crate::macros::set_maybe_value(
					&mut self, stringify!($name), val.map(|x| serde_json::Value::String(x.to_string()))
				);
				self
			}
		}
	};

	($name:ident::$rename:ident -> &str) => {
		paste::item! {
			fn [< set_$name >](mut self, val: Option<&str>) -> Self {
				$crate::macros::set_maybe_value(
					&mut self, stringify!($rename), val.map(|x| serde_json::Value::String(x.to_string()))
				);
				self
			}
		}
	};

	($name:ident -> value) => {
		paste::item! {
			fn [< set_$name >](mut self, val: Option<serde_json::Value>) -> Self {
				$crate::macros::set_maybe_value(
					&mut self, stringify!($name), val
				);
				self
			}
		}
	};

	($name:ident::$rename:ident -> value) => {
		paste::item! {
			fn [< set_$name >](mut self, val: Option<serde_json::Value>) -> Self {
				$crate::macros::set_maybe_value(
					&mut self, stringify!($rename), val
				);
				self
			}
		}
	};
}

pub(crate) use setter;

pub fn set_maybe_value(obj: &mut serde_json::Value, key: &str, value: Option<serde_json::Value>) {
	if let Some(map) = obj.as_object_mut() {
		match value {
			Some(x) => map.insert(key.to_string(), x),
			None => map.remove(key),
		};
	} else {
		tracing::error!("error setting '{key}' on json Value: not an object");
	}
}
