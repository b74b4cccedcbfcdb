#[cfg(test)]
mod common;
#[cfg(test)]
mod test_constraint;
#[cfg(test)]
mod test_encode;
#[cfg(test)]
mod test_gather;
#[cfg(test)]
mod test_lower;
#[cfg(test)]
mod test_pipeline;
#[cfg(test)]
mod test_synonym;
